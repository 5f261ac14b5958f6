use serde::{Deserialize, Serialize};

/// Immutable snapshot of a product line captured at the moment a document is
/// written. Later price changes on the product never alter it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_name: String,
    pub qty: i32,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

/// A requested line in a multi-line submission, before stock is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRequest {
    pub product_id: i32,
    pub qty: i32,
}
