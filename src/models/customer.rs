use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{Customer as DomainCustomer, NewCustomer as DomainNewCustomer};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub id: i32,
    pub store_id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer<'a> {
    pub store_id: i32,
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
}

impl From<Customer> for DomainCustomer {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id,
            store_id: value.store_id,
            name: value.name,
            phone: value.phone,
            address: value.address,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(value: &'a DomainNewCustomer) -> Self {
        Self {
            store_id: value.store_id,
            name: value.name.as_str(),
            phone: value.phone.as_deref(),
            address: value.address.as_deref(),
        }
    }
}
