use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::feature::{plan_bundle, segment_bundle};
use crate::domain::store::{
    Branding, NewStore as DomainNewStore, Plan, Segment, Store as DomainStore, SubscriptionStatus,
    UpdateBranding,
};
use crate::models::store::{
    NewStore as DbNewStore, NewStoreBranding, Store as DbStore, StoreBranding as DbStoreBranding,
    UpdateStoreBranding,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, StoreReader, StoreWriter, feature};

fn load_store(conn: &mut SqliteConnection, store_id: i32) -> RepositoryResult<DbStore> {
    use crate::schema::stores;

    stores::table
        .find(store_id)
        .first::<DbStore>(conn)
        .optional()?
        .ok_or(RepositoryError::StoreNotFound)
}

impl StoreReader for DieselRepository {
    fn get_store_by_id(&self, id: i32) -> RepositoryResult<Option<DomainStore>> {
        use crate::schema::stores;

        let mut conn = self.conn()?;
        let store = stores::table
            .find(id)
            .first::<DbStore>(&mut conn)
            .optional()?;

        Ok(store.map(DomainStore::from))
    }

    fn get_store_by_name(&self, name: &str) -> RepositoryResult<Option<DomainStore>> {
        use crate::schema::stores;

        let mut conn = self.conn()?;
        // The name column is declared COLLATE NOCASE, so equality is already
        // case-insensitive.
        let store = stores::table
            .filter(stores::name.eq(name.trim()))
            .first::<DbStore>(&mut conn)
            .optional()?;

        Ok(store.map(DomainStore::from))
    }

    fn get_branding(&self, store_id: i32) -> RepositoryResult<Option<Branding>> {
        use crate::schema::store_branding;

        let mut conn = self.conn()?;
        let branding = store_branding::table
            .filter(store_branding::store_id.eq(store_id))
            .first::<DbStoreBranding>(&mut conn)
            .optional()?;

        Ok(branding.map(Branding::from))
    }
}

impl StoreWriter for DieselRepository {
    fn create_store(&self, new_store: &DomainNewStore) -> RepositoryResult<DomainStore> {
        use crate::schema::{store_branding, stores};

        let mut conn = self.conn()?;

        conn.transaction::<DomainStore, RepositoryError, _>(|conn| {
            let existing = stores::table
                .filter(stores::name.eq(new_store.name.trim()))
                .first::<DbStore>(conn)
                .optional()?;

            if existing.is_some() {
                return Err(RepositoryError::Conflict(format!(
                    "store `{}` already exists",
                    new_store.name
                )));
            }

            let created: DbStore = diesel::insert_into(stores::table)
                .values(&DbNewStore::from(new_store))
                .get_result(conn)?;

            diesel::insert_into(store_branding::table)
                .values(&NewStoreBranding {
                    store_id: created.id,
                    whatsapp_support: None,
                })
                .execute(conn)?;

            feature::seed_defaults(conn, created.id)?;
            for (flag, enabled) in segment_bundle(new_store.segment) {
                feature::set_flag(conn, created.id, flag, enabled)?;
            }

            Ok(created.into_domain())
        })
    }

    fn set_plan(&self, store_id: i32, plan: Plan) -> RepositoryResult<DomainStore> {
        use crate::schema::stores;

        let mut conn = self.conn()?;

        conn.transaction::<DomainStore, RepositoryError, _>(|conn| {
            let updated = diesel::update(stores::table.find(store_id))
                .set(stores::plan.eq(plan.as_str()))
                .execute(conn)?;
            if updated == 0 {
                return Err(RepositoryError::StoreNotFound);
            }

            // The bundle overwrites exactly the premium flags; core and
            // segment flags stay untouched.
            for (flag, enabled) in plan_bundle(plan) {
                feature::set_flag(conn, store_id, flag, enabled)?;
            }

            Ok(load_store(conn, store_id)?.into_domain())
        })
    }

    fn set_segment(&self, store_id: i32, segment: Segment) -> RepositoryResult<DomainStore> {
        use crate::schema::stores;

        let mut conn = self.conn()?;

        conn.transaction::<DomainStore, RepositoryError, _>(|conn| {
            let updated = diesel::update(stores::table.find(store_id))
                .set(stores::segment.eq(segment.as_str()))
                .execute(conn)?;
            if updated == 0 {
                return Err(RepositoryError::StoreNotFound);
            }

            for (flag, enabled) in segment_bundle(segment) {
                feature::set_flag(conn, store_id, flag, enabled)?;
            }

            Ok(load_store(conn, store_id)?.into_domain())
        })
    }

    fn set_subscription(
        &self,
        store_id: i32,
        status: SubscriptionStatus,
        paid_until: Option<DateTime<Utc>>,
    ) -> RepositoryResult<DomainStore> {
        use crate::schema::stores;

        let mut conn = self.conn()?;

        let updated = diesel::update(stores::table.find(store_id))
            .set((
                stores::subscription_status.eq(status.as_str()),
                stores::paid_until.eq(paid_until.map(|until| until.naive_utc())),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(RepositoryError::StoreNotFound);
        }

        Ok(load_store(&mut conn, store_id)?.into_domain())
    }

    fn update_branding(
        &self,
        store_id: i32,
        updates: &UpdateBranding,
    ) -> RepositoryResult<Branding> {
        use crate::schema::store_branding;

        let mut conn = self.conn()?;

        let target = store_branding::table.filter(store_branding::store_id.eq(store_id));
        let updated: DbStoreBranding = diesel::update(target)
            .set(&UpdateStoreBranding::from(updates))
            .get_result(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Branding::from(updated))
    }
}
