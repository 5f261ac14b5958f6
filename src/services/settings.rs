use crate::auth::AuthenticatedUser;
use crate::domain::feature::{Feature, FeatureFlag};
use crate::domain::store::{Branding, Store};
use crate::domain::user::{NewUser, User};
use crate::forms::settings::{AddUserForm, BrandingForm, ChangePlanForm, ChangeSegmentForm};
use crate::repository::{FeatureReader, StoreReader, StoreWriter, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, authorize, require_admin};

/// Data required to render the settings page.
pub struct SettingsPageData {
    pub store: Store,
    pub branding: Option<Branding>,
    pub features: Vec<FeatureFlag>,
    pub users: Vec<User>,
}

/// Loads the settings page. Admin only; no feature gate, so a store on any
/// plan can always reach its own settings.
pub fn load_settings_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SettingsPageData>
where
    R: StoreReader + FeatureReader + UserReader + ?Sized,
{
    require_admin(user)?;

    let store = repo
        .get_store_by_id(user.store_id)?
        .ok_or(ServiceError::Unauthorized)?;
    let branding = repo.get_branding(store.id)?;
    let features = repo.list_features(store.id)?;
    let users = repo.list_users(store.id)?;

    Ok(SettingsPageData {
        store,
        branding,
        features,
        users,
    })
}

/// Moves the store to another plan, overwriting the premium flags with the
/// plan's bundle.
pub fn change_plan<R>(repo: &R, user: &AuthenticatedUser, form: ChangePlanForm) -> ServiceResult<Store>
where
    R: StoreReader + StoreWriter + ?Sized,
{
    require_admin(user)?;
    let plan = form.into_plan()?;
    Ok(repo.set_plan(user.store_id, plan)?)
}

/// Moves the store to another segment, toggling the two workflow flags.
pub fn change_segment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ChangeSegmentForm,
) -> ServiceResult<Store>
where
    R: StoreReader + StoreWriter + ?Sized,
{
    require_admin(user)?;
    let segment = form.into_segment()?;
    Ok(repo.set_segment(user.store_id, segment)?)
}

/// Updates the store branding. Admin plus the `white_label` feature.
pub fn update_branding<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: BrandingForm,
) -> ServiceResult<Branding>
where
    R: StoreReader + StoreWriter + FeatureReader + ?Sized,
{
    require_admin(user)?;
    let store = authorize(repo, user, Feature::WhiteLabel)?;
    let updates = form.into_update()?;
    Ok(repo.update_branding(store.id, &updates)?)
}

/// Adds another login to the store. Admin plus the `multi_user` feature.
pub fn add_user<R>(repo: &R, user: &AuthenticatedUser, form: AddUserForm) -> ServiceResult<User>
where
    R: StoreReader + FeatureReader + UserWriter + ?Sized,
{
    require_admin(user)?;
    let store = authorize(repo, user, Feature::MultiUser)?;

    let (username, password, role) = form.into_parts()?;

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_user(&NewUser::new(store.id, username, password_hash, role))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repository::mock::{MockStoreReader, MockStoreWriter};
    use crate::repository::errors::RepositoryResult;
    use crate::domain::store::{Plan, Segment, SubscriptionStatus, StoreCounters};
    use chrono::NaiveDateTime;

    struct FakeRepo {
        store_reader: MockStoreReader,
        store_writer: MockStoreWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                store_reader: MockStoreReader::new(),
                store_writer: MockStoreWriter::new(),
            }
        }
    }

    impl StoreReader for FakeRepo {
        fn get_store_by_id(&self, id: i32) -> RepositoryResult<Option<Store>> {
            self.store_reader.get_store_by_id(id)
        }

        fn get_store_by_name(&self, name: &str) -> RepositoryResult<Option<Store>> {
            self.store_reader.get_store_by_name(name)
        }

        fn get_branding(&self, store_id: i32) -> RepositoryResult<Option<Branding>> {
            self.store_reader.get_branding(store_id)
        }
    }

    impl StoreWriter for FakeRepo {
        fn create_store(
            &self,
            new_store: &crate::domain::store::NewStore,
        ) -> RepositoryResult<Store> {
            self.store_writer.create_store(new_store)
        }

        fn set_plan(&self, store_id: i32, plan: Plan) -> RepositoryResult<Store> {
            self.store_writer.set_plan(store_id, plan)
        }

        fn set_segment(&self, store_id: i32, segment: Segment) -> RepositoryResult<Store> {
            self.store_writer.set_segment(store_id, segment)
        }

        fn set_subscription(
            &self,
            store_id: i32,
            status: SubscriptionStatus,
            paid_until: Option<chrono::DateTime<chrono::Utc>>,
        ) -> RepositoryResult<Store> {
            self.store_writer
                .set_subscription(store_id, status, paid_until)
        }

        fn update_branding(
            &self,
            store_id: i32,
            updates: &crate::domain::store::UpdateBranding,
        ) -> RepositoryResult<Branding> {
            self.store_writer.update_branding(store_id, updates)
        }
    }

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 1,
            store_id: 6,
            username: "ana".to_string(),
            role: "admin".to_string(),
        }
    }

    fn staff() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 2,
            store_id: 6,
            username: "bia".to_string(),
            role: "staff".to_string(),
        }
    }

    fn sample_store(plan: Plan) -> Store {
        Store {
            id: 6,
            name: "Loja A".to_string(),
            segment: Segment::Deposito,
            plan,
            subscription_status: SubscriptionStatus::Active,
            paid_until: None,
            counters: StoreCounters {
                next_order_seq: 1,
                next_sale_seq: 1,
                next_tab_seq: 1,
            },
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn changing_plans_is_admin_only() {
        let repo = FakeRepo::new();

        let result = change_plan(
            &repo,
            &staff(),
            ChangePlanForm {
                plan: "elite".to_string(),
            },
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn changing_plans_applies_the_parsed_plan() {
        let mut repo = FakeRepo::new();
        repo.store_writer
            .expect_set_plan()
            .times(1)
            .withf(|store_id, plan| {
                assert_eq!(*store_id, 6);
                assert_eq!(*plan, Plan::Elite);
                true
            })
            .returning(|_, plan| Ok(sample_store(plan)));

        let store = change_plan(
            &repo,
            &admin(),
            ChangePlanForm {
                plan: "elite".to_string(),
            },
        )
        .expect("expected success");

        assert_eq!(store.plan, Plan::Elite);
    }

    #[test]
    fn unknown_plans_are_rejected() {
        let repo = FakeRepo::new();

        let result = change_plan(
            &repo,
            &admin(),
            ChangePlanForm {
                plan: "platinum".to_string(),
            },
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
