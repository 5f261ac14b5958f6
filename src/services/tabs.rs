use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::feature::Feature;
use crate::domain::sale::Sale;
use crate::domain::tab::{NewTab, Tab, TabListQuery};
use crate::forms::tabs::{AddTabItemsForm, OpenTabForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{FeatureReader, StoreReader, TabReader, TabWriter};
use crate::services::{ServiceError, ServiceResult, authorize};

/// Query parameters accepted by the tabs index page.
#[derive(Debug, Default, Deserialize)]
pub struct TabsQuery {
    pub page: Option<usize>,
}

/// Data required to render the tabs index template.
pub struct TabsPageData {
    /// Open tabs first, newest within each group.
    pub tabs: Paginated<Tab>,
}

/// Loads the tabs page.
pub fn load_tabs_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: TabsQuery,
) -> ServiceResult<TabsPageData>
where
    R: StoreReader + FeatureReader + TabReader + ?Sized,
{
    let store = authorize(repo, user, Feature::Tables)?;

    let page = query.page.unwrap_or(1);
    let (total, tabs) =
        repo.list_tabs(TabListQuery::new(store.id).paginate(page, DEFAULT_ITEMS_PER_PAGE))?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    Ok(TabsPageData {
        tabs: Paginated::new(tabs, page, total_pages),
    })
}

/// Opens a tab for a table: allocates the next `C-` number, zero total.
pub fn open_tab<R>(repo: &R, user: &AuthenticatedUser, form: OpenTabForm) -> ServiceResult<Tab>
where
    R: StoreReader + FeatureReader + TabWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Tables)?;
    let table_name = form.into_table_name()?;
    Ok(repo.open_tab(&NewTab::new(store.id, table_name))?)
}

/// Adds items to an open tab, reserving stock per line and growing the
/// running total.
pub fn add_tab_items<R>(
    repo: &R,
    user: &AuthenticatedUser,
    tab_id: i32,
    form: AddTabItemsForm,
) -> ServiceResult<Tab>
where
    R: StoreReader + FeatureReader + TabWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Tables)?;

    let lines = form
        .into_lines()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    Ok(repo.add_tab_items(tab_id, store.id, &lines)?)
}

/// Closes a tab and returns it together with the sale it converted into.
/// Closing twice returns the same sale.
pub fn close_tab<R>(repo: &R, user: &AuthenticatedUser, tab_id: i32) -> ServiceResult<(Tab, Sale)>
where
    R: StoreReader + FeatureReader + TabWriter + ?Sized,
{
    let store = authorize(repo, user, Feature::Tables)?;
    Ok(repo.close_tab(tab_id, store.id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDateTime, Utc};

    use crate::domain::item::LineRequest;
    use crate::domain::store::{
        Branding, Plan, Segment, Store, StoreCounters, SubscriptionStatus,
    };
    use crate::domain::tab::TabStatus;
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockFeatureReader, MockStoreReader, MockTabWriter};
    use crate::repository::{FeatureReader, StoreReader, TabWriter};

    struct FakeRepo {
        store_reader: MockStoreReader,
        feature_reader: MockFeatureReader,
        tab_writer: MockTabWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                store_reader: MockStoreReader::new(),
                feature_reader: MockFeatureReader::new(),
                tab_writer: MockTabWriter::new(),
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

    impl TabWriter for FakeRepo {
        fn open_tab(&self, new_tab: &NewTab) -> RepositoryResult<Tab> {
            self.tab_writer.open_tab(new_tab)
        }

        fn add_tab_items(
            &self,
            tab_id: i32,
            store_id: i32,
            lines: &[LineRequest],
        ) -> RepositoryResult<Tab> {
            self.tab_writer.add_tab_items(tab_id, store_id, lines)
        }

        fn close_tab(&self, tab_id: i32, store_id: i32) -> RepositoryResult<(Tab, Sale)> {
            self.tab_writer.close_tab(tab_id, store_id)
        }
    }

    fn bar_store() -> Store {
        Store {
            id: 12,
            name: "Bar do Zé".to_string(),
            segment: Segment::Bar,
            plan: Plan::Pro,
            subscription_status: SubscriptionStatus::Active,
            paid_until: Some(Utc::now() + Duration::days(30)),
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
            user_id: 3,
            store_id: 12,
            username: "zé".to_string(),
            role: "admin".to_string(),
        }
    }

    fn sample_tab(id: i32, store_id: i32) -> Tab {
        Tab {
            id,
            store_id,
            number: Some("C-000001".to_string()),
            table_name: "Mesa 4".to_string(),
            status: TabStatus::Aberta,
            total_cents: 0,
            converted_sale_id: None,
            closed_at: None,
            items: Vec::new(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn opening_a_tab_requires_the_tables_feature() {
        let mut repo = FakeRepo::new();
        repo.store_reader
            .expect_get_store_by_id()
            .returning(|_| Ok(Some(bar_store())));
        repo.feature_reader
            .expect_is_feature_enabled()
            .withf(|_, feature| *feature == Feature::Tables)
            .returning(|_, _| Ok(false));

        let form = OpenTabForm {
            table_name: "Mesa 4".to_string(),
        };

        let result = open_tab(&repo, &sample_user(), form);
        assert!(
            matches!(result, Err(ServiceError::FeatureNotLicensed(key)) if key == "segment_tables")
        );
    }

    #[test]
    fn open_tab_passes_the_table_name_through() {
        let mut repo = FakeRepo::new();
        repo.store_reader
            .expect_get_store_by_id()
            .returning(|_| Ok(Some(bar_store())));
        repo.feature_reader
            .expect_is_feature_enabled()
            .returning(|_, _| Ok(true));
        repo.tab_writer
            .expect_open_tab()
            .times(1)
            .withf(|payload| {
                assert_eq!(payload.store_id, 12);
                assert_eq!(payload.table_name, "Mesa 4");
                true
            })
            .returning(|payload| Ok(sample_tab(1, payload.store_id)));

        let form = OpenTabForm {
            table_name: " Mesa 4 ".to_string(),
        };

        let tab = open_tab(&repo, &sample_user(), form).expect("expected success");
        assert_eq!(tab.number.as_deref(), Some("C-000001"));
    }

    #[test]
    fn empty_item_submissions_never_reach_the_repository() {
        let mut repo = FakeRepo::new();
        repo.store_reader
            .expect_get_store_by_id()
            .returning(|_| Ok(Some(bar_store())));
        repo.feature_reader
            .expect_is_feature_enabled()
            .returning(|_, _| Ok(true));
        repo.tab_writer.expect_add_tab_items().never();

        let form = AddTabItemsForm {
            product_id: vec![0],
            qty: vec![0],
        };

        let result = add_tab_items(&repo, &sample_user(), 1, form);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
