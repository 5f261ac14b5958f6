use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::item::LineItem;
use crate::domain::order::Order as DomainOrder;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub store_id: i32,
    pub number: Option<String>,
    pub customer_name: Option<String>,
    pub status: String,
    pub total_cents: i64,
    pub converted_sale_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_name: String,
    pub qty: i32,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub store_id: i32,
    pub number: Option<&'a str>,
    pub customer_name: Option<&'a str>,
    pub status: &'a str,
    pub total_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem<'a> {
    pub order_id: i32,
    pub product_name: &'a str,
    pub qty: i32,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

impl Order {
    pub fn into_domain(self, items: Vec<LineItem>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            store_id: self.store_id,
            number: self.number,
            customer_name: self.customer_name,
            status: self.status.as_str().into(),
            total_cents: self.total_cents,
            converted_sale_id: self.converted_sale_id,
            items,
            created_at: self.created_at,
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        let items = value.1.into_iter().map(OrderItem::into_line).collect();
        value.0.into_domain(items)
    }
}

impl OrderItem {
    pub fn into_line(self) -> LineItem {
        LineItem {
            product_name: self.product_name,
            qty: self.qty,
            price_cents: self.price_cents,
            line_total_cents: self.line_total_cents,
        }
    }
}

impl<'a> NewOrderItem<'a> {
    pub fn from_line(order_id: i32, line: &'a LineItem) -> Self {
        Self {
            order_id,
            product_name: line.product_name.as_str(),
            qty: line.qty,
            price_cents: line.price_cents,
            line_total_cents: line.line_total_cents,
        }
    }
}
