use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::item::LineItem;
use crate::pagination::Pagination;

/// A bar tab is either open for new items or closed for good. Closing is
/// one-way and converts the tab into a sale.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TabStatus {
    Aberta,
    Fechada,
}

impl Default for TabStatus {
    fn default() -> Self {
        Self::Aberta
    }
}

impl TabStatus {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "aberta" => Some(Self::Aberta),
            "fechada" => Some(Self::Fechada),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aberta => "aberta",
            Self::Fechada => "fechada",
        }
    }
}

/// Fallback conversion for values read back from storage.
impl From<&str> for TabStatus {
    fn from(value: &str) -> Self {
        TabStatus::parse(value).unwrap_or_default()
    }
}

/// A table tab belonging to a bar store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tab {
    pub id: i32,
    pub store_id: i32,
    /// Sequential document number (`C-000001`).
    pub number: Option<String>,
    pub table_name: String,
    pub status: TabStatus,
    /// Running total; grows as items are added while the tab is open.
    pub total_cents: i64,
    /// Idempotence marker: the sale this tab was converted into on close.
    pub converted_sale_id: Option<i32>,
    pub closed_at: Option<NaiveDateTime>,
    pub items: Vec<LineItem>,
    pub created_at: NaiveDateTime,
}

/// Payload required to open a tab. Tabs start empty with a zero total.
#[derive(Debug, Clone)]
pub struct NewTab {
    pub store_id: i32,
    pub table_name: String,
}

impl NewTab {
    pub fn new(store_id: i32, table_name: impl Into<String>) -> Self {
        Self {
            store_id,
            table_name: table_name.into(),
        }
    }
}

/// Query definition used to list tabs for a store.
#[derive(Debug, Clone)]
pub struct TabListQuery {
    pub store_id: i32,
    pub status: Option<TabStatus>,
    pub pagination: Option<Pagination>,
}

impl TabListQuery {
    pub fn new(store_id: i32) -> Self {
        Self {
            store_id,
            status: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: TabStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
