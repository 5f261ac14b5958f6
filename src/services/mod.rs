use chrono::Utc;
use thiserror::Error;

use crate::auth::AuthenticatedUser;
use crate::domain::feature::Feature;
use crate::domain::store::Store;
use crate::repository::errors::RepositoryError;
use crate::repository::{FeatureReader, StoreReader};

pub mod auth;
pub mod context;
pub mod customers;
pub mod main;
pub mod orders;
pub mod products;
pub mod sales;
pub mod settings;
pub mod tabs;

/// Operation-level error taxonomy. Routes translate these into localized
/// flash messages; nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    Conflict,
    /// The tenant's subscription blocks all operations; carries the reason
    /// shown to the user.
    #[error("subscription blocked: {0}")]
    SubscriptionBlocked(String),
    /// The operation requires a feature the tenant's plan does not include.
    #[error("feature `{0}` is not licensed")]
    FeatureNotLicensed(&'static str),
    #[error("product not found")]
    ProductNotFound,
    #[error("insufficient stock for `{0}`")]
    InsufficientStock(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    #[error("{0}")]
    Form(String),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
            // A vanished tenant invalidates the whole session.
            RepositoryError::StoreNotFound => Self::Unauthorized,
            RepositoryError::ProductNotFound => Self::ProductNotFound,
            RepositoryError::InsufficientStock(name) => Self::InsufficientStock(name),
            RepositoryError::InvalidStatus(input) => Self::InvalidStatus(input),
            RepositoryError::InvalidTransition { from, to } => {
                Self::InvalidStatus(format!("{from} -> {to}"))
            }
            RepositoryError::Conflict(_) => Self::Conflict,
            other => Self::Repository(other),
        }
    }
}

/// Loads the caller's store and runs the two access gates every write and
/// gated read goes through: the subscription gate first, then the feature
/// gate. Fails closed on a missing flag row.
pub(crate) fn authorize<R>(
    repo: &R,
    user: &AuthenticatedUser,
    feature: Feature,
) -> ServiceResult<Store>
where
    R: StoreReader + FeatureReader + ?Sized,
{
    let store = repo
        .get_store_by_id(user.store_id)?
        .ok_or(ServiceError::Unauthorized)?;

    if let Some(reason) = store.subscription_block(Utc::now()) {
        return Err(ServiceError::SubscriptionBlocked(reason.to_string()));
    }

    if !repo.is_feature_enabled(store.id, feature)? {
        return Err(ServiceError::FeatureNotLicensed(feature.key()));
    }

    Ok(store)
}

/// Admin-only guard used by the settings services.
pub(crate) fn require_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if !user.is_admin() {
        return Err(ServiceError::Unauthorized);
    }
    Ok(())
}
