use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;

use crate::domain::item::LineRequest;
use crate::domain::sale::Sale as DomainSale;
use crate::domain::store::DocumentKind;
use crate::domain::tab::{NewTab as DomainNewTab, Tab as DomainTab, TabListQuery, TabStatus};
use crate::models::tab::{
    NewTab as DbNewTab, NewTabItem as DbNewTabItem, Tab as DbTab, TabItem as DbTabItem,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TabReader, TabWriter, convert, sequence, stock};

fn load_tab_with_items(conn: &mut SqliteConnection, tab_id: i32) -> RepositoryResult<DomainTab> {
    use crate::schema::{tab_items, tabs};

    let tab = tabs::table
        .find(tab_id)
        .first::<DbTab>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    let items = tab_items::table
        .filter(tab_items::tab_id.eq(tab.id))
        .order(tab_items::id.asc())
        .load::<DbTabItem>(conn)?;

    Ok(DomainTab::from((tab, items)))
}

impl TabReader for DieselRepository {
    fn get_tab_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<DomainTab>> {
        use crate::schema::{tab_items, tabs};

        let mut conn = self.conn()?;

        let Some(tab) = tabs::table
            .filter(tabs::id.eq(id))
            .filter(tabs::store_id.eq(store_id))
            .first::<DbTab>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let items = tab_items::table
            .filter(tab_items::tab_id.eq(tab.id))
            .order(tab_items::id.asc())
            .load::<DbTabItem>(&mut conn)?;

        Ok(Some(DomainTab::from((tab, items))))
    }

    fn list_tabs(&self, query: TabListQuery) -> RepositoryResult<(usize, Vec<DomainTab>)> {
        use crate::schema::{tab_items, tabs};

        let mut conn = self.conn()?;

        let TabListQuery {
            store_id,
            status,
            pagination,
        } = query;

        let status_filter = status.map(TabStatus::as_str);

        let mut count_query = tabs::table
            .filter(tabs::store_id.eq(store_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(status_value) = status_filter {
            count_query = count_query.filter(tabs::status.eq(status_value));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = tabs::table
            .filter(tabs::store_id.eq(store_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(status_value) = status_filter {
            items = items.filter(tabs::status.eq(status_value));
        }
        // Open tabs first ("aberta" sorts before "fechada"), newest within
        // each group.
        items = items.order((tabs::status.asc(), tabs::id.desc()));

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_tabs = items.load::<DbTab>(&mut conn)?;
        let tab_ids: Vec<i32> = db_tabs.iter().map(|tab| tab.id).collect();

        let mut items_by_tab: HashMap<i32, Vec<DbTabItem>> = HashMap::new();
        if !tab_ids.is_empty() {
            let rows = tab_items::table
                .filter(tab_items::tab_id.eq_any(&tab_ids))
                .order(tab_items::id.asc())
                .load::<DbTabItem>(&mut conn)?;
            for item in rows {
                items_by_tab.entry(item.tab_id).or_default().push(item);
            }
        }

        let tabs = db_tabs
            .into_iter()
            .map(|tab| {
                let items = items_by_tab.remove(&tab.id).unwrap_or_default();
                DomainTab::from((tab, items))
            })
            .collect();

        Ok((total, tabs))
    }
}

impl TabWriter for DieselRepository {
    fn open_tab(&self, new_tab: &DomainNewTab) -> RepositoryResult<DomainTab> {
        use crate::schema::tabs;

        let mut conn = self.conn()?;

        conn.transaction::<DomainTab, RepositoryError, _>(|conn| {
            let number = sequence::allocate(conn, new_tab.store_id, DocumentKind::Tab)?;

            let created: DbTab = diesel::insert_into(tabs::table)
                .values(&DbNewTab {
                    store_id: new_tab.store_id,
                    number: Some(number.as_str()),
                    table_name: new_tab.table_name.as_str(),
                    status: TabStatus::Aberta.as_str(),
                    total_cents: 0,
                })
                .get_result(conn)?;

            Ok(created.into_domain(Vec::new()))
        })
    }

    fn add_tab_items(
        &self,
        tab_id: i32,
        store_id: i32,
        lines: &[LineRequest],
    ) -> RepositoryResult<DomainTab> {
        use crate::schema::{tab_items, tabs};

        let mut conn = self.conn()?;

        conn.transaction::<DomainTab, RepositoryError, _>(|conn| {
            let tab = tabs::table
                .filter(tabs::id.eq(tab_id))
                .filter(tabs::store_id.eq(store_id))
                .first::<DbTab>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            if TabStatus::from(tab.status.as_str()) != TabStatus::Aberta {
                return Err(RepositoryError::Conflict(
                    "items can only be added to an open tab".to_string(),
                ));
            }

            let mut added_cents = 0i64;
            for line in lines {
                let snapshot = stock::reserve(conn, store_id, line.product_id, line.qty)?;
                added_cents += snapshot.line_total_cents;
                diesel::insert_into(tab_items::table)
                    .values(&DbNewTabItem::from_line(tab.id, &snapshot))
                    .execute(conn)?;
            }

            diesel::update(tabs::table.find(tab.id))
                .set(tabs::total_cents.eq(tabs::total_cents + added_cents))
                .execute(conn)?;

            load_tab_with_items(conn, tab.id)
        })
    }

    fn close_tab(&self, tab_id: i32, store_id: i32) -> RepositoryResult<(DomainTab, DomainSale)> {
        use crate::schema::tabs;

        let mut conn = self.conn()?;

        conn.transaction::<(DomainTab, DomainSale), RepositoryError, _>(|conn| {
            let tab = tabs::table
                .filter(tabs::id.eq(tab_id))
                .filter(tabs::store_id.eq(store_id))
                .first::<DbTab>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            // Closing twice hands back the sale produced the first time.
            if TabStatus::from(tab.status.as_str()) == TabStatus::Fechada
                || tab.converted_sale_id.is_some()
            {
                let sale = convert::tab_to_sale(conn, &tab)?;
                return Ok((load_tab_with_items(conn, tab.id)?, sale));
            }

            diesel::update(tabs::table.find(tab.id))
                .set((
                    tabs::status.eq(TabStatus::Fechada.as_str()),
                    tabs::closed_at.eq(Some(Utc::now().naive_utc())),
                ))
                .execute(conn)?;

            let sale = convert::tab_to_sale(conn, &tab)?;

            Ok((load_tab_with_items(conn, tab.id)?, sale))
        })
    }
}
