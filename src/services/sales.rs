use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::feature::Feature;
use crate::domain::sale::{NewSale, Sale, SaleListQuery};
use crate::forms::sales::NewSaleForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{FeatureReader, SaleReader, SaleWriter, StoreReader};
use crate::services::{ServiceError, ServiceResult, authorize};

/// Query parameters accepted by the sales index page.
#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub page: Option<usize>,
}

/// Data required to render the sales index template.
pub struct SalesPageData {
    pub sales: Paginated<Sale>,
}

/// Loads the sales history page.
pub fn load_sales_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SalesQuery,
) -> ServiceResult<SalesPageData>
where
    R: StoreReader + FeatureReader + SaleReader + ?Sized,
{
    let store = authorize(repo, user, Feature::Sales)?;

    let page = query.page.unwrap_or(1);
    let (total, sales) =
        repo.list_sales(SaleListQuery::new(store.id).paginate(page, DEFAULT_ITEMS_PER_PAGE))?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    Ok(SalesPageData {
        sales: Paginated::new(sales, page, total_pages),
    })
}

/// Registers a point-of-sale sale: reserves stock per line and allocates the
/// next `V-` number in one transaction.
pub fn create_sale<R>(repo: &R, user: &AuthenticatedUser, form: NewSaleForm) -> ServiceResult<Sale>
where
    R: StoreReader + FeatureReader + SaleWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Sales)?;

    let (customer_name, lines) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_sale(&NewSale::new(store.id, customer_name, lines))?)
}

/// Returns every sale of the store for the CSV export. Gated by the
/// `reports_export` premium feature, not by `core_sales`.
pub fn export_sales<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Sale>>
where
    R: StoreReader + FeatureReader + SaleReader + ?Sized,
{
    let store = authorize(repo, user, Feature::ReportsExport)?;
    let (_, sales) = repo.list_sales(SaleListQuery::new(store.id))?;
    Ok(sales)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDateTime, Utc};

    use crate::domain::sale::SalesStats;
    use crate::domain::store::{
        Branding, Plan, Segment, Store, StoreCounters, SubscriptionStatus,
    };
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockFeatureReader, MockSaleReader, MockStoreReader};
    use crate::repository::{FeatureReader, SaleReader, StoreReader};

    struct FakeRepo {
        store_reader: MockStoreReader,
        feature_reader: MockFeatureReader,
        sale_reader: MockSaleReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                store_reader: MockStoreReader::new(),
                feature_reader: MockFeatureReader::new(),
                sale_reader: MockSaleReader::new(),
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

    impl FeatureReader for FakeRepo {
        fn is_feature_enabled(&self, store_id: i32, feature: Feature) -> RepositoryResult<bool> {
            self.feature_reader.is_feature_enabled(store_id, feature)
        }

        fn list_features(
            &self,
            store_id: i32,
        ) -> RepositoryResult<Vec<crate::domain::feature::FeatureFlag>> {
            self.feature_reader.list_features(store_id)
        }
    }

    impl SaleReader for FakeRepo {
        fn get_sale_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<Sale>> {
            self.sale_reader.get_sale_by_id(id, store_id)
        }

        fn list_sales(&self, query: SaleListQuery) -> RepositoryResult<(usize, Vec<Sale>)> {
            self.sale_reader.list_sales(query)
        }

        fn sales_stats(
            &self,
            store_id: i32,
            now: DateTime<Utc>,
        ) -> RepositoryResult<SalesStats> {
            self.sale_reader.sales_stats(store_id, now)
        }
    }

    fn store_with(status: SubscriptionStatus, paid_until: Option<DateTime<Utc>>) -> Store {
        Store {
            id: 4,
            name: "Loja A".to_string(),
            segment: Segment::Deposito,
            plan: Plan::Elite,
            subscription_status: status,
            paid_until,
            counters: StoreCounters {
                next_order_seq: 1,
                next_sale_seq: 1,
                next_tab_seq: 1,
            },
            created_at: NaiveDateTime::default(),
        }
    }

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 1,
            store_id: 4,
            username: "ana".to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn export_requires_the_reports_feature() {
        let mut repo = FakeRepo::new();
        repo.store_reader.expect_get_store_by_id().returning(|_| {
            Ok(Some(store_with(
                SubscriptionStatus::Active,
                Some(Utc::now() + Duration::days(30)),
            )))
        });
        repo.feature_reader
            .expect_is_feature_enabled()
            .times(1)
            .withf(|_, feature| *feature == Feature::ReportsExport)
            .returning(|_, _| Ok(false));

        let result = export_sales(&repo, &sample_user());

        assert!(
            matches!(result, Err(ServiceError::FeatureNotLicensed(key)) if key == "reports_export")
        );
    }

    #[test]
    fn expired_trial_blocks_the_export_before_the_feature_gate_runs() {
        let mut repo = FakeRepo::new();
        repo.store_reader.expect_get_store_by_id().returning(|_| {
            Ok(Some(store_with(
                SubscriptionStatus::Trial,
                Some(Utc::now() - Duration::days(1)),
            )))
        });
        // The feature gate must not even be consulted.
        repo.feature_reader.expect_is_feature_enabled().never();

        let result = export_sales(&repo, &sample_user());

        assert!(matches!(result, Err(ServiceError::SubscriptionBlocked(_))));
    }

    #[test]
    fn export_returns_every_sale() {
        let mut repo = FakeRepo::new();
        repo.store_reader.expect_get_store_by_id().returning(|_| {
            Ok(Some(store_with(
                SubscriptionStatus::Active,
                Some(Utc::now() + Duration::days(30)),
            )))
        });
        repo.feature_reader
            .expect_is_feature_enabled()
            .returning(|_, _| Ok(true));
        repo.sale_reader
            .expect_list_sales()
            .times(1)
            .withf(|query| {
                assert_eq!(query.store_id, 4);
                assert!(query.pagination.is_none());
                true
            })
            .returning(|query| {
                Ok((
                    1,
                    vec![Sale {
                        id: 1,
                        store_id: query.store_id,
                        number: Some("V-000001".to_string()),
                        customer_name: None,
                        total_cents: 600,
                        status: "concluida".to_string(),
                        items: Vec::new(),
                        created_at: NaiveDateTime::default(),
                    }],
                ))
            });

        let sales = export_sales(&repo, &sample_user()).expect("expected success");
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].number.as_deref(), Some("V-000001"));
    }
}
