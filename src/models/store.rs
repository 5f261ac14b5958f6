use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::store::{
    Branding as DomainBranding, NewStore as DomainNewStore, Plan, Segment, Store as DomainStore,
    StoreCounters, SubscriptionStatus, UpdateBranding as DomainUpdateBranding,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::stores)]
pub struct Store {
    pub id: i32,
    pub name: String,
    pub segment: String,
    pub plan: String,
    pub subscription_status: String,
    pub paid_until: Option<NaiveDateTime>,
    pub next_order_seq: i64,
    pub next_sale_seq: i64,
    pub next_tab_seq: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stores)]
pub struct NewStore<'a> {
    pub name: &'a str,
    pub segment: &'a str,
    pub plan: &'a str,
    pub subscription_status: &'a str,
    pub paid_until: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::store_branding)]
pub struct StoreBranding {
    pub id: i32,
    pub store_id: i32,
    pub product_name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub whatsapp_support: Option<String>,
    pub receipt_footer: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::store_branding)]
pub struct NewStoreBranding<'a> {
    pub store_id: i32,
    pub whatsapp_support: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::store_branding)]
pub struct UpdateStoreBranding<'a> {
    pub product_name: &'a str,
    pub primary_color: &'a str,
    pub secondary_color: &'a str,
    pub whatsapp_support: Option<Option<&'a str>>,
    pub receipt_footer: Option<Option<&'a str>>,
}

impl Store {
    pub fn into_domain(self) -> DomainStore {
        DomainStore {
            id: self.id,
            name: self.name,
            segment: Segment::parse(&self.segment).unwrap_or(Segment::Deposito),
            plan: Plan::parse(&self.plan).unwrap_or(Plan::Basic),
            subscription_status: SubscriptionStatus::parse(&self.subscription_status)
                .unwrap_or(SubscriptionStatus::Trial),
            // Timestamps are stored as naive UTC; attach the offset here so
            // every later comparison is aware-vs-aware.
            paid_until: self
                .paid_until
                .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)),
            counters: StoreCounters {
                next_order_seq: self.next_order_seq,
                next_sale_seq: self.next_sale_seq,
                next_tab_seq: self.next_tab_seq,
            },
            created_at: self.created_at,
        }
    }
}

impl From<Store> for DomainStore {
    fn from(value: Store) -> Self {
        value.into_domain()
    }
}

impl<'a> From<&'a DomainNewStore> for NewStore<'a> {
    fn from(value: &'a DomainNewStore) -> Self {
        Self {
            name: value.name.as_str(),
            segment: value.segment.as_str(),
            plan: Plan::Basic.as_str(),
            subscription_status: SubscriptionStatus::Trial.as_str(),
            paid_until: Some(value.trial_until.naive_utc()),
        }
    }
}

impl From<StoreBranding> for DomainBranding {
    fn from(value: StoreBranding) -> Self {
        Self {
            store_id: value.store_id,
            product_name: value.product_name,
            primary_color: value.primary_color,
            secondary_color: value.secondary_color,
            whatsapp_support: value.whatsapp_support,
            receipt_footer: value.receipt_footer,
        }
    }
}

impl<'a> From<&'a DomainUpdateBranding> for UpdateStoreBranding<'a> {
    fn from(value: &'a DomainUpdateBranding) -> Self {
        Self {
            product_name: value.product_name.as_str(),
            primary_color: value.primary_color.as_str(),
            secondary_color: value.secondary_color.as_str(),
            whatsapp_support: Some(value.whatsapp_support.as_deref()),
            receipt_footer: Some(value.receipt_footer.as_deref()),
        }
    }
}
