use chrono::{DateTime, Utc};

use crate::db::{DbConnection, DbPool};
use crate::domain::customer::{Customer, CustomerListQuery, NewCustomer};
use crate::domain::feature::{Feature, FeatureFlag};
use crate::domain::item::LineRequest;
use crate::domain::order::{NewOrder, Order, OrderListQuery, OrderStatus};
use crate::domain::product::{NewProduct, Product, ProductListQuery};
use crate::domain::sale::{NewSale, Sale, SaleListQuery, SalesStats};
use crate::domain::store::{
    Branding, NewStore, Plan, Segment, Store, SubscriptionStatus, UpdateBranding,
};
use crate::domain::tab::{NewTab, Tab, TabListQuery};
use crate::domain::user::{NewUser, User};

pub mod errors;

mod convert;
mod customer;
mod feature;
mod order;
mod product;
mod sale;
mod sequence;
mod stock;
mod store;
mod tab;
mod user;

#[cfg(test)]
pub mod mock;

use self::errors::RepositoryResult;

/// Diesel-backed repository implementation that wraps an r2d2 pool.
///
/// Every write operation runs inside a single transaction: sequence
/// allocation, stock reservation, document/line inserts and conversion commit
/// or roll back together.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over stores.
pub trait StoreReader {
    fn get_store_by_id(&self, id: i32) -> RepositoryResult<Option<Store>>;
    fn get_store_by_name(&self, name: &str) -> RepositoryResult<Option<Store>>;
    fn get_branding(&self, store_id: i32) -> RepositoryResult<Option<Branding>>;
}

/// Write operations over stores.
pub trait StoreWriter {
    /// Creates the store with a trial subscription, default branding and the
    /// full default feature flag set, in one transaction.
    fn create_store(&self, new_store: &NewStore) -> RepositoryResult<Store>;
    /// Assigns a plan and overwrites the premium flags with its bundle.
    fn set_plan(&self, store_id: i32, plan: Plan) -> RepositoryResult<Store>;
    /// Assigns a segment and toggles the two workflow flags.
    fn set_segment(&self, store_id: i32, segment: Segment) -> RepositoryResult<Store>;
    /// Manual billing switch: updates status and paid-until together.
    fn set_subscription(
        &self,
        store_id: i32,
        status: SubscriptionStatus,
        paid_until: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Store>;
    fn update_branding(&self, store_id: i32, updates: &UpdateBranding)
    -> RepositoryResult<Branding>;
}

/// Read-only operations over feature flags.
pub trait FeatureReader {
    /// Missing rows read as disabled; this never fails open.
    fn is_feature_enabled(&self, store_id: i32, feature: Feature) -> RepositoryResult<bool>;
    fn list_features(&self, store_id: i32) -> RepositoryResult<Vec<FeatureFlag>>;
}

/// Write operations over feature flags.
pub trait FeatureWriter {
    fn set_feature(&self, store_id: i32, feature: Feature, enabled: bool) -> RepositoryResult<()>;
}

/// Read-only operations over users.
pub trait UserReader {
    fn get_user_by_username(&self, store_id: i32, username: &str)
    -> RepositoryResult<Option<User>>;
    fn list_users(&self, store_id: i32) -> RepositoryResult<Vec<User>>;
}

/// Write operations over users.
pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

/// Read-only operations over products.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    fn count_low_stock(&self, store_id: i32, threshold: i32) -> RepositoryResult<i64>;
}

/// Write operations over products.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32, store_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over customers.
pub trait CustomerReader {
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
}

/// Write operations over customers.
pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn delete_customer(&self, customer_id: i32, store_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over sales.
pub trait SaleReader {
    fn get_sale_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Sale>>;
    fn list_sales(&self, query: SaleListQuery) -> RepositoryResult<(usize, Vec<Sale>)>;
    fn sales_stats(&self, store_id: i32, now: DateTime<Utc>) -> RepositoryResult<SalesStats>;
}

/// Write operations over sales.
pub trait SaleWriter {
    /// Point-of-sale path: allocates a `V-` number and reserves stock per
    /// line in one transaction.
    fn create_sale(&self, new_sale: &NewSale) -> RepositoryResult<Sale>;
}

/// Read-only operations over orders.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    fn count_open_orders(&self, store_id: i32) -> RepositoryResult<i64>;
}

/// Write operations over orders.
pub trait OrderWriter {
    /// Allocates a `P-` number and reserves stock per line in one
    /// transaction.
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    /// Applies a lifecycle transition. Entering `entregue` converts the
    /// order into a sale atomically; repeating it returns the same sale.
    fn set_order_status(
        &self,
        order_id: i32,
        store_id: i32,
        new_status: OrderStatus,
    ) -> RepositoryResult<(Order, Option<Sale>)>;
}

/// Read-only operations over tabs.
pub trait TabReader {
    fn get_tab_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Tab>>;
    fn list_tabs(&self, query: TabListQuery) -> RepositoryResult<(usize, Vec<Tab>)>;
}

/// Write operations over tabs.
pub trait TabWriter {
    /// Allocates a `C-` number; the tab starts open with a zero total.
    fn open_tab(&self, new_tab: &NewTab) -> RepositoryResult<Tab>;
    /// Reserves stock for each line and grows the running total. Only
    /// allowed while the tab is open.
    fn add_tab_items(
        &self,
        tab_id: i32,
        store_id: i32,
        lines: &[LineRequest],
    ) -> RepositoryResult<Tab>;
    /// One-way close; converts the tab into a sale atomically. Closing an
    /// already-closed tab returns the existing sale.
    fn close_tab(&self, tab_id: i32, store_id: i32) -> RepositoryResult<(Tab, Sale)>;
}
