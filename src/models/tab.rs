use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::item::LineItem;
use crate::domain::tab::Tab as DomainTab;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tabs)]
pub struct Tab {
    pub id: i32,
    pub store_id: i32,
    pub number: Option<String>,
    pub table_name: String,
    pub status: String,
    pub total_cents: i64,
    pub converted_sale_id: Option<i32>,
    pub closed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::tab_items)]
#[diesel(belongs_to(Tab, foreign_key = tab_id))]
pub struct TabItem {
    pub id: i32,
    pub tab_id: i32,
    pub product_name: String,
    pub qty: i32,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tabs)]
pub struct NewTab<'a> {
    pub store_id: i32,
    pub number: Option<&'a str>,
    pub table_name: &'a str,
    pub status: &'a str,
    pub total_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tab_items)]
pub struct NewTabItem<'a> {
    pub tab_id: i32,
    pub product_name: &'a str,
    pub qty: i32,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

impl Tab {
    pub fn into_domain(self, items: Vec<LineItem>) -> DomainTab {
        DomainTab {
            id: self.id,
            store_id: self.store_id,
            number: self.number,
            table_name: self.table_name,
            status: self.status.as_str().into(),
            total_cents: self.total_cents,
            converted_sale_id: self.converted_sale_id,
            closed_at: self.closed_at,
            items,
            created_at: self.created_at,
        }
    }
}

impl From<(Tab, Vec<TabItem>)> for DomainTab {
    fn from(value: (Tab, Vec<TabItem>)) -> Self {
        let items = value.1.into_iter().map(TabItem::into_line).collect();
        value.0.into_domain(items)
    }
}

impl TabItem {
    pub fn into_line(self) -> LineItem {
        LineItem {
            product_name: self.product_name,
            qty: self.qty,
            price_cents: self.price_cents,
            line_total_cents: self.line_total_cents,
        }
    }
}

impl<'a> NewTabItem<'a> {
    pub fn from_line(tab_id: i32, line: &'a LineItem) -> Self {
        Self {
            tab_id,
            product_name: line.product_name.as_str(),
            qty: line.qty,
            price_cents: line.price_cents,
            line_total_cents: line.line_total_cents,
        }
    }
}
