use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::feature::Feature;
use crate::domain::order::{NewOrder, Order, OrderListQuery, OrderStatus};
use crate::domain::sale::Sale;
use crate::forms::orders::{NewOrderForm, SetStatusForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{FeatureReader, OrderReader, OrderWriter, StoreReader};
use crate::services::{ServiceError, ServiceResult, authorize};

/// Query parameters accepted by the orders index page.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Optional status filter ("novo", "separando"/"preparo", ...).
    pub status: Option<String>,
    pub page: Option<usize>,
}

/// Data required to render the orders index template.
pub struct OrdersPageData {
    pub orders: Paginated<Order>,
    pub status: Option<OrderStatus>,
}

/// Loads the orders page, optionally filtered by status.
pub fn load_orders_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<OrdersPageData>
where
    R: StoreReader + FeatureReader + OrderReader + ?Sized,
{
    let store = authorize(repo, user, Feature::Orders)?;

    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            OrderStatus::parse(raw).ok_or_else(|| ServiceError::InvalidStatus(raw.to_string()))?,
        ),
    };

    let page = query.page.unwrap_or(1);
    let mut list_query = OrderListQuery::new(store.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, orders) = repo.list_orders(list_query)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    Ok(OrdersPageData {
        orders: Paginated::new(orders, page, total_pages),
        status,
    })
}

/// Creates an order: allocates the next `P-` number and reserves stock for
/// every line in one transaction.
pub fn create_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: NewOrderForm,
) -> ServiceResult<Order>
where
    R: StoreReader + FeatureReader + OrderWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Orders)?;

    let (customer_name, lines) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.create_order(&NewOrder::new(store.id, customer_name, lines))?)
}

/// Applies a lifecycle transition to an order. Delivery (`entregue`)
/// produces the converted sale; repeating it returns the same sale.
pub fn update_order_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    form: SetStatusForm,
) -> ServiceResult<(Order, Option<Sale>)>
where
    R: StoreReader + FeatureReader + OrderWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Orders)?;

    let status = OrderStatus::parse(&form.status)
        .ok_or_else(|| ServiceError::InvalidStatus(form.status.clone()))?;

    Ok(repo.set_order_status(order_id, store.id, status)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDateTime, Utc};

    use crate::domain::store::{
        Branding, Plan, Segment, Store, StoreCounters, SubscriptionStatus,
    };
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockFeatureReader, MockOrderWriter, MockStoreReader};
    use crate::repository::{FeatureReader, OrderWriter, StoreReader};

    struct FakeRepo {
        store_reader: MockStoreReader,
        feature_reader: MockFeatureReader,
        order_writer: MockOrderWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                store_reader: MockStoreReader::new(),
                feature_reader: MockFeatureReader::new(),
                order_writer: MockOrderWriter::new(),
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

    impl OrderWriter for FakeRepo {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order> {
            self.order_writer.create_order(new_order)
        }

        fn set_order_status(
            &self,
            order_id: i32,
            store_id: i32,
            new_status: OrderStatus,
        ) -> RepositoryResult<(Order, Option<Sale>)> {
            self.order_writer
                .set_order_status(order_id, store_id, new_status)
        }
    }

    fn store_with(status: SubscriptionStatus, paid_until: Option<DateTime<Utc>>) -> Store {
        Store {
            id: 8,
            name: "Loja A".to_string(),
            segment: Segment::Delivery,
            plan: Plan::Basic,
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
            user_id: 2,
            store_id: 8,
            username: "bea".to_string(),
            role: "manager".to_string(),
        }
    }

    fn order_form() -> NewOrderForm {
        NewOrderForm {
            customer_name: Some("Carlos".to_string()),
            product_id: vec![10],
            qty: vec![3],
        }
    }

    #[test]
    fn create_order_is_blocked_without_the_segment_feature() {
        let mut repo = FakeRepo::new();
        repo.store_reader.expect_get_store_by_id().returning(|_| {
            Ok(Some(store_with(
                SubscriptionStatus::Active,
                Some(Utc::now() + Duration::days(30)),
            )))
        });
        repo.feature_reader
            .expect_is_feature_enabled()
            .withf(|_, feature| *feature == Feature::Orders)
            .returning(|_, _| Ok(false));

        let result = create_order(&repo, &sample_user(), order_form());

        assert!(
            matches!(result, Err(ServiceError::FeatureNotLicensed(key)) if key == "segment_orders")
        );
    }

    #[test]
    fn blocked_subscription_stops_orders_even_with_the_feature_enabled() {
        let mut repo = FakeRepo::new();
        repo.store_reader
            .expect_get_store_by_id()
            .returning(|_| Ok(Some(store_with(SubscriptionStatus::PastDue, None))));
        repo.feature_reader.expect_is_feature_enabled().never();
        repo.order_writer.expect_create_order().never();

        let result = create_order(&repo, &sample_user(), order_form());

        assert!(matches!(result, Err(ServiceError::SubscriptionBlocked(_))));
    }

    #[test]
    fn create_order_passes_the_collected_lines_to_the_repository() {
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
        repo.order_writer
            .expect_create_order()
            .times(1)
            .withf(|payload| {
                assert_eq!(payload.store_id, 8);
                assert_eq!(payload.customer_name.as_deref(), Some("Carlos"));
                assert_eq!(payload.lines.len(), 1);
                assert_eq!(payload.lines[0].product_id, 10);
                assert_eq!(payload.lines[0].qty, 3);
                true
            })
            .returning(|payload| {
                Ok(Order {
                    id: 21,
                    store_id: payload.store_id,
                    number: Some("P-000001".to_string()),
                    customer_name: payload.customer_name.clone(),
                    status: OrderStatus::Novo,
                    total_cents: 600,
                    converted_sale_id: None,
                    items: Vec::new(),
                    created_at: NaiveDateTime::default(),
                })
            });

        let order = create_order(&repo, &sample_user(), order_form()).expect("expected success");
        assert_eq!(order.number.as_deref(), Some("P-000001"));
        assert_eq!(order.status, OrderStatus::Novo);
    }

    #[test]
    fn unknown_status_input_is_rejected_before_the_repository_runs() {
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
        repo.order_writer.expect_set_order_status().never();

        let result = update_order_status(
            &repo,
            &sample_user(),
            5,
            SetStatusForm {
                status: "despachado".to_string(),
            },
        );

        assert!(matches!(result, Err(ServiceError::InvalidStatus(input)) if input == "despachado"));
    }

    #[test]
    fn both_picking_spellings_reach_the_repository_as_one_state() {
        for spelling in ["separando", "preparo"] {
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
            repo.order_writer
                .expect_set_order_status()
                .times(1)
                .withf(|_, _, status| *status == OrderStatus::Separando)
                .returning(|order_id, store_id, status| {
                    Ok((
                        Order {
                            id: order_id,
                            store_id,
                            number: Some("P-000001".to_string()),
                            customer_name: None,
                            status,
                            total_cents: 0,
                            converted_sale_id: None,
                            items: Vec::new(),
                            created_at: NaiveDateTime::default(),
                        },
                        None,
                    ))
                });

            let result = update_order_status(
                &repo,
                &sample_user(),
                5,
                SetStatusForm {
                    status: spelling.to_string(),
                },
            );
            assert!(result.is_ok());
        }
    }
}
