use chrono::{DateTime, Utc};
use mockall::mock;

use super::{
    CustomerReader, CustomerWriter, FeatureReader, FeatureWriter, OrderReader, OrderWriter,
    ProductReader, ProductWriter, SaleReader, SaleWriter, StoreReader, StoreWriter, TabReader,
    TabWriter, UserReader, UserWriter,
};
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
use crate::repository::errors::RepositoryResult;

mock! {
    pub StoreReader {}

    impl StoreReader for StoreReader {
        fn get_store_by_id(&self, id: i32) -> RepositoryResult<Option<Store>>;
        fn get_store_by_name(&self, name: &str) -> RepositoryResult<Option<Store>>;
        fn get_branding(&self, store_id: i32) -> RepositoryResult<Option<Branding>>;
    }
}

mock! {
    pub StoreWriter {}

    impl StoreWriter for StoreWriter {
        fn create_store(&self, new_store: &NewStore) -> RepositoryResult<Store>;
        fn set_plan(&self, store_id: i32, plan: Plan) -> RepositoryResult<Store>;
        fn set_segment(&self, store_id: i32, segment: Segment) -> RepositoryResult<Store>;
        fn set_subscription(
            &self,
            store_id: i32,
            status: SubscriptionStatus,
            paid_until: Option<DateTime<Utc>>,
        ) -> RepositoryResult<Store>;
        fn update_branding(&self, store_id: i32, updates: &UpdateBranding) -> RepositoryResult<Branding>;
    }
}

mock! {
    pub FeatureReader {}

    impl FeatureReader for FeatureReader {
        fn is_feature_enabled(&self, store_id: i32, feature: Feature) -> RepositoryResult<bool>;
        fn list_features(&self, store_id: i32) -> RepositoryResult<Vec<FeatureFlag>>;
    }
}

mock! {
    pub FeatureWriter {}

    impl FeatureWriter for FeatureWriter {
        fn set_feature(&self, store_id: i32, feature: Feature, enabled: bool) -> RepositoryResult<()>;
    }
}

mock! {
    pub UserReader {}

    impl UserReader for UserReader {
        fn get_user_by_username(&self, store_id: i32, username: &str) -> RepositoryResult<Option<User>>;
        fn list_users(&self, store_id: i32) -> RepositoryResult<Vec<User>>;
    }
}

mock! {
    pub UserWriter {}

    impl UserWriter for UserWriter {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn count_low_stock(&self, store_id: i32, threshold: i32) -> RepositoryResult<i64>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32, store_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CustomerReader {}

    impl CustomerReader for CustomerReader {
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
    }
}

mock! {
    pub CustomerWriter {}

    impl CustomerWriter for CustomerWriter {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn delete_customer(&self, customer_id: i32, store_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub SaleReader {}

    impl SaleReader for SaleReader {
        fn get_sale_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Sale>>;
        fn list_sales(&self, query: SaleListQuery) -> RepositoryResult<(usize, Vec<Sale>)>;
        fn sales_stats(&self, store_id: i32, now: DateTime<Utc>) -> RepositoryResult<SalesStats>;
    }
}

mock! {
    pub SaleWriter {}

    impl SaleWriter for SaleWriter {
        fn create_sale(&self, new_sale: &NewSale) -> RepositoryResult<Sale>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
        fn count_open_orders(&self, store_id: i32) -> RepositoryResult<i64>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn set_order_status(
            &self,
            order_id: i32,
            store_id: i32,
            new_status: OrderStatus,
        ) -> RepositoryResult<(Order, Option<Sale>)>;
    }
}

mock! {
    pub TabReader {}

    impl TabReader for TabReader {
        fn get_tab_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Tab>>;
        fn list_tabs(&self, query: TabListQuery) -> RepositoryResult<(usize, Vec<Tab>)>;
    }
}

mock! {
    pub TabWriter {}

    impl TabWriter for TabWriter {
        fn open_tab(&self, new_tab: &NewTab) -> RepositoryResult<Tab>;
        fn add_tab_items(&self, tab_id: i32, store_id: i32, lines: &[LineRequest]) -> RepositoryResult<Tab>;
        fn close_tab(&self, tab_id: i32, store_id: i32) -> RepositoryResult<(Tab, Sale)>;
    }
}
