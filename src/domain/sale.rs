use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::item::{LineItem, LineRequest};
use crate::pagination::Pagination;

/// Status written on every sale the system generates, whether from the
/// point-of-sale screen or from a converted order/tab.
pub const SALE_COMPLETED: &str = "concluida";

/// A finished sale. Immutable once written.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Sale {
    pub id: i32,
    pub store_id: i32,
    /// Sequential document number (`V-000001`).
    pub number: Option<String>,
    pub customer_name: Option<String>,
    pub total_cents: i64,
    pub status: String,
    pub items: Vec<LineItem>,
    pub created_at: NaiveDateTime,
}

/// Payload for a direct point-of-sale sale. Stock is reserved per line.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub store_id: i32,
    pub customer_name: Option<String>,
    pub lines: Vec<LineRequest>,
}

impl NewSale {
    pub fn new(store_id: i32, customer_name: Option<String>, lines: Vec<LineRequest>) -> Self {
        Self {
            store_id,
            customer_name,
            lines,
        }
    }
}

/// Query definition used to list sales for a store.
#[derive(Debug, Clone)]
pub struct SaleListQuery {
    pub store_id: i32,
    pub pagination: Option<Pagination>,
}

impl SaleListQuery {
    pub fn new(store_id: i32) -> Self {
        Self {
            store_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SalesStats {
    pub today_value_cents: i64,
    pub today_count: i64,
    pub month_value_cents: i64,
}
