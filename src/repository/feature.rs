use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::feature::{ALL_FEATURES, Feature, FeatureFlag};
use crate::models::feature::{NewStoreFeature, StoreFeature as DbStoreFeature};
use crate::repository::{DieselRepository, FeatureReader, FeatureWriter};
use crate::repository::errors::RepositoryResult;

/// Upsert a single flag row for a store.
pub(crate) fn set_flag(
    conn: &mut SqliteConnection,
    store_id: i32,
    feature: Feature,
    enabled: bool,
) -> RepositoryResult<()> {
    use crate::schema::store_features;

    diesel::insert_into(store_features::table)
        .values(&NewStoreFeature {
            store_id,
            key: feature.key(),
            enabled,
        })
        .on_conflict((store_features::store_id, store_features::key))
        .do_update()
        .set(store_features::enabled.eq(enabled))
        .execute(conn)?;

    Ok(())
}

/// Insert the default value for every known flag the store does not have a
/// row for yet. Existing rows are left alone.
pub(crate) fn seed_defaults(conn: &mut SqliteConnection, store_id: i32) -> RepositoryResult<()> {
    use crate::schema::store_features;

    for feature in ALL_FEATURES {
        diesel::insert_or_ignore_into(store_features::table)
            .values(&NewStoreFeature {
                store_id,
                key: feature.key(),
                enabled: feature.default_enabled(),
            })
            .execute(conn)?;
    }

    Ok(())
}

impl FeatureReader for DieselRepository {
    fn is_feature_enabled(&self, store_id: i32, feature: Feature) -> RepositoryResult<bool> {
        use crate::schema::store_features;

        let mut conn = self.conn()?;

        let enabled = store_features::table
            .filter(store_features::store_id.eq(store_id))
            .filter(store_features::key.eq(feature.key()))
            .select(store_features::enabled)
            .first::<bool>(&mut conn)
            .optional()?;

        // A missing row means the feature was never granted: fail closed.
        Ok(enabled.unwrap_or(false))
    }

    fn list_features(&self, store_id: i32) -> RepositoryResult<Vec<FeatureFlag>> {
        use crate::schema::store_features;

        let mut conn = self.conn()?;

        let rows = store_features::table
            .filter(store_features::store_id.eq(store_id))
            .order(store_features::key.asc())
            .load::<DbStoreFeature>(&mut conn)?;

        Ok(rows.into_iter().map(FeatureFlag::from).collect())
    }
}

impl FeatureWriter for DieselRepository {
    fn set_feature(&self, store_id: i32, feature: Feature, enabled: bool) -> RepositoryResult<()> {
        let mut conn = self.conn()?;
        set_flag(&mut conn, store_id, feature, enabled)
    }
}
