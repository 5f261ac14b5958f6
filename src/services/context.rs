use std::collections::HashMap;

use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::domain::store::{Branding, Plan, Segment};
use crate::repository::{FeatureReader, StoreReader};
use crate::services::{ServiceError, ServiceResult};

/// Per-tenant data every page renders: branding, the active segment/plan and
/// the flag map the navigation uses to show or hide sections.
///
/// Deliberately not gated: the navigation still renders while the
/// subscription is blocked, so the user can reach the billing page.
#[derive(Debug, Serialize)]
pub struct TenantContext {
    pub store_name: String,
    pub segment: Segment,
    pub plan: Plan,
    pub branding: Option<Branding>,
    pub features: HashMap<String, bool>,
}

pub fn load_tenant_context<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<TenantContext>
where
    R: StoreReader + FeatureReader + ?Sized,
{
    let store = repo
        .get_store_by_id(user.store_id)?
        .ok_or(ServiceError::Unauthorized)?;

    let branding = repo.get_branding(store.id)?;

    let features = repo
        .list_features(store.id)?
        .into_iter()
        .map(|flag| (flag.key, flag.enabled))
        .collect();

    Ok(TenantContext {
        store_name: store.name,
        segment: store.segment,
        plan: store.plan,
        branding,
        features,
    })
}
