use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// A catalog product with live stock. Documents never reference it directly;
/// they carry immutable line snapshots instead.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    pub id: i32,
    pub store_id: i32,
    pub name: String,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub store_id: i32,
    pub name: String,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
}

impl NewProduct {
    pub fn new(store_id: i32, name: impl Into<String>, price_cents: i64, stock: i32) -> Self {
        Self {
            store_id,
            name: name.into(),
            sku: None,
            price_cents,
            stock,
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }
}

/// Query definition used to list products for a store.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    pub store_id: i32,
    /// Case-insensitive match against name or SKU.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn new(store_id: i32) -> Self {
        Self {
            store_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
