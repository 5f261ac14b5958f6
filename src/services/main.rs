use chrono::Utc;
use serde::Serialize;

use crate::LOW_STOCK_THRESHOLD;
use crate::auth::AuthenticatedUser;
use crate::domain::feature::Feature;
use crate::domain::sale::{Sale, SaleListQuery};
use crate::repository::{FeatureReader, OrderReader, ProductReader, SaleReader, StoreReader};
use crate::services::{ServiceResult, authorize};

/// Aggregates rendered on the dashboard cards.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub sales_today_value_cents: i64,
    pub sales_today_count: i64,
    pub sales_month_value_cents: i64,
    pub ticket_avg_cents: i64,
    pub pending_orders: i64,
    pub low_stock: i64,
}

/// Data required to render the dashboard.
pub struct DashboardData {
    pub stats: DashboardStats,
    pub last_sales: Vec<Sale>,
}

/// Loads the dashboard aggregates for the authenticated user's store.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: StoreReader + FeatureReader + SaleReader + OrderReader + ProductReader + ?Sized,
{
    let store = authorize(repo, user, Feature::Dashboard)?;

    let sales = repo.sales_stats(store.id, Utc::now())?;
    let pending_orders = repo.count_open_orders(store.id)?;
    let low_stock = repo.count_low_stock(store.id, LOW_STOCK_THRESHOLD)?;
    let (_, last_sales) = repo.list_sales(SaleListQuery::new(store.id).paginate(1, 10))?;

    let ticket_avg_cents = if sales.today_count > 0 {
        sales.today_value_cents / sales.today_count
    } else {
        0
    };

    Ok(DashboardData {
        stats: DashboardStats {
            sales_today_value_cents: sales.today_value_cents,
            sales_today_count: sales.today_count,
            sales_month_value_cents: sales.month_value_cents,
            ticket_avg_cents,
            pending_orders,
            low_stock,
        },
        last_sales,
    })
}
