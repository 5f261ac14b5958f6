use chrono::{Duration, Utc};

use crate::auth::AuthenticatedUser;
use crate::domain::store::{NewStore, Store, TRIAL_DAYS};
use crate::domain::user::NewUser;
use crate::forms::auth::{LoginForm, SetupForm};
use crate::repository::{StoreReader, StoreWriter, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// bcrypt truncates beyond 72 bytes; longer passwords are rejected instead
/// of being silently cut.
const PASSWORD_MAX_BYTES: usize = 72;

/// Resolves the store by name, the user within it and the password, and
/// returns the session identity. The subscription gate does not run here: a
/// blocked tenant can still log in to reach the billing page.
pub fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<AuthenticatedUser>
where
    R: StoreReader + UserReader + ?Sized,
{
    let (store_name, username, password) = form.into_parts()?;

    let store = repo
        .get_store_by_name(&store_name)?
        .ok_or(ServiceError::NotFound)?;

    let user = repo
        .get_user_by_username(store.id, &username)?
        .ok_or(ServiceError::Unauthorized)?;

    let verified = bcrypt::verify(&password, &user.password_hash)
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    if !verified {
        return Err(ServiceError::Unauthorized);
    }

    Ok(AuthenticatedUser {
        user_id: user.id,
        store_id: store.id,
        username: user.username,
        role: user.role,
    })
}

/// Creates a store with its trial window, seeded flags and branding, plus
/// the initial admin account, and returns the new store.
pub fn register_store<R>(repo: &R, form: SetupForm) -> ServiceResult<Store>
where
    R: StoreWriter + UserWriter + ?Sized,
{
    let (store_name, username, password, segment) = form.into_parts()?;

    if password.len() > PASSWORD_MAX_BYTES {
        return Err(ServiceError::Form(
            "Senha muito grande. Use até 72 bytes.".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let trial_until = Utc::now() + Duration::days(TRIAL_DAYS);
    let store = repo.create_store(&NewStore::new(store_name, segment, trial_until))?;

    repo.create_user(&NewUser::new(
        store.id,
        username,
        password_hash,
        crate::ADMIN_ROLE,
    ))?;

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::domain::store::{Plan, Segment, StoreCounters, SubscriptionStatus};
    use crate::domain::user::User;
    use crate::repository::mock::{MockStoreReader, MockUserReader};
    use crate::repository::{StoreReader, UserReader};
    use crate::repository::errors::RepositoryResult;
    use crate::domain::store::Branding;

    struct FakeRepo {
        store_reader: MockStoreReader,
        user_reader: MockUserReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                store_reader: MockStoreReader::new(),
                user_reader: MockUserReader::new(),
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

    impl UserReader for FakeRepo {
        fn get_user_by_username(
            &self,
            store_id: i32,
            username: &str,
        ) -> RepositoryResult<Option<User>> {
            self.user_reader.get_user_by_username(store_id, username)
        }

        fn list_users(&self, store_id: i32) -> RepositoryResult<Vec<User>> {
            self.user_reader.list_users(store_id)
        }
    }

    fn sample_store(id: i32, name: &str) -> Store {
        Store {
            id,
            name: name.to_string(),
            segment: Segment::Deposito,
            plan: Plan::Basic,
            subscription_status: SubscriptionStatus::Trial,
            paid_until: None,
            counters: StoreCounters {
                next_order_seq: 1,
                next_sale_seq: 1,
                next_tab_seq: 1,
            },
            created_at: NaiveDateTime::default(),
        }
    }

    fn sample_user(store_id: i32, username: &str, password: &str) -> User {
        User {
            id: 7,
            store_id,
            username: username.to_string(),
            password_hash: bcrypt::hash(password, 4).expect("hash"),
            role: "admin".to_string(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn login_unknown_store_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.store_reader
            .expect_get_store_by_name()
            .returning(|_| Ok(None));

        let form = LoginForm {
            store_name: "Loja X".to_string(),
            username: "ana".to_string(),
            password: "secret".to_string(),
        };

        assert!(matches!(login(&repo, form), Err(ServiceError::NotFound)));
    }

    #[test]
    fn login_wrong_password_is_unauthorized() {
        let mut repo = FakeRepo::new();
        repo.store_reader
            .expect_get_store_by_name()
            .returning(|_| Ok(Some(sample_store(3, "Loja A"))));
        repo.user_reader
            .expect_get_user_by_username()
            .returning(|store_id, username| Ok(Some(sample_user(store_id, username, "right"))));

        let form = LoginForm {
            store_name: "Loja A".to_string(),
            username: "ana".to_string(),
            password: "wrong".to_string(),
        };

        assert!(matches!(login(&repo, form), Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn login_returns_the_session_identity() {
        let mut repo = FakeRepo::new();
        repo.store_reader
            .expect_get_store_by_name()
            .returning(|_| Ok(Some(sample_store(3, "Loja A"))));
        repo.user_reader
            .expect_get_user_by_username()
            .returning(|store_id, username| Ok(Some(sample_user(store_id, username, "secret"))));

        let form = LoginForm {
            store_name: "Loja A".to_string(),
            username: "ana".to_string(),
            password: "secret".to_string(),
        };

        let user = login(&repo, form).expect("expected success");
        assert_eq!(user.store_id, 3);
        assert_eq!(user.user_id, 7);
        assert_eq!(user.role, "admin");
    }
}
