use diesel::prelude::*;

use crate::domain::feature::FeatureFlag as DomainFeatureFlag;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::store_features)]
pub struct StoreFeature {
    pub id: i32,
    pub store_id: i32,
    pub key: String,
    pub enabled: bool,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::store_features)]
pub struct NewStoreFeature<'a> {
    pub store_id: i32,
    pub key: &'a str,
    pub enabled: bool,
}

impl From<StoreFeature> for DomainFeatureFlag {
    fn from(value: StoreFeature) -> Self {
        Self {
            store_id: value.store_id,
            key: value.key,
            enabled: value.enabled,
        }
    }
}
