use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub store_id: i32,
    pub name: String,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub stock: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub store_id: i32,
    pub name: &'a str,
    pub sku: Option<&'a str>,
    pub price_cents: i64,
    pub stock: i32,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            store_id: value.store_id,
            name: value.name,
            sku: value.sku,
            price_cents: value.price_cents,
            stock: value.stock,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            store_id: value.store_id,
            name: value.name.as_str(),
            sku: value.sku.as_deref(),
            price_cents: value.price_cents,
            stock: value.stock,
        }
    }
}
