use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::item::LineItem;
use crate::domain::sale::Sale as DomainSale;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sales)]
pub struct Sale {
    pub id: i32,
    pub store_id: i32,
    pub number: Option<String>,
    pub customer_name: Option<String>,
    pub total_cents: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::sale_items)]
#[diesel(belongs_to(Sale, foreign_key = sale_id))]
pub struct SaleItem {
    pub id: i32,
    pub sale_id: i32,
    pub product_name: String,
    pub qty: i32,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sales)]
pub struct NewSale<'a> {
    pub store_id: i32,
    pub number: Option<&'a str>,
    pub customer_name: Option<&'a str>,
    pub total_cents: i64,
    pub status: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sale_items)]
pub struct NewSaleItem<'a> {
    pub sale_id: i32,
    pub product_name: &'a str,
    pub qty: i32,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

impl Sale {
    pub fn into_domain(self, items: Vec<LineItem>) -> DomainSale {
        DomainSale {
            id: self.id,
            store_id: self.store_id,
            number: self.number,
            customer_name: self.customer_name,
            total_cents: self.total_cents,
            status: self.status,
            items,
            created_at: self.created_at,
        }
    }
}

impl From<(Sale, Vec<SaleItem>)> for DomainSale {
    fn from(value: (Sale, Vec<SaleItem>)) -> Self {
        let items = value.1.into_iter().map(SaleItem::into_line).collect();
        value.0.into_domain(items)
    }
}

impl SaleItem {
    pub fn into_line(self) -> LineItem {
        LineItem {
            product_name: self.product_name,
            qty: self.qty,
            price_cents: self.price_cents,
            line_total_cents: self.line_total_cents,
        }
    }
}

impl<'a> NewSaleItem<'a> {
    pub fn from_line(sale_id: i32, line: &'a LineItem) -> Self {
        Self {
            sale_id,
            product_name: line.product_name.as_str(),
            qty: line.qty,
            price_cents: line.price_cents,
            line_total_cents: line.line_total_cents,
        }
    }
}
