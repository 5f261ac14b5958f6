use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// A registered customer of a store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Customer {
    pub id: i32,
    pub store_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub store_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl NewCustomer {
    pub fn new(store_id: i32, name: impl Into<String>) -> Self {
        Self {
            store_id,
            name: name.into(),
            phone: None,
            address: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Query definition used to list customers for a store.
#[derive(Debug, Clone)]
pub struct CustomerListQuery {
    pub store_id: i32,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
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
