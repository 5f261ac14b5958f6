use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;

use crate::domain::sale::{
    NewSale as DomainNewSale, SALE_COMPLETED, Sale as DomainSale, SaleListQuery, SalesStats,
};
use crate::domain::store::DocumentKind;
use crate::models::sale::{
    NewSale as DbNewSale, NewSaleItem as DbNewSaleItem, Sale as DbSale, SaleItem as DbSaleItem,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, SaleReader, SaleWriter, sequence, stock};

fn day_window(now: DateTime<Utc>) -> (NaiveDateTime, NaiveDateTime) {
    let start = now.date_naive().and_time(NaiveTime::MIN);
    (start, start + Duration::days(1))
}

fn month_window(now: DateTime<Utc>) -> (NaiveDateTime, NaiveDateTime) {
    let today = now.date_naive();
    let first = today.with_day(1).unwrap_or(today);
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
    .unwrap_or(first);
    (first.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN))
}

fn load_items_by_sale(
    conn: &mut SqliteConnection,
    sale_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DbSaleItem>>> {
    use crate::schema::sale_items;

    let mut grouped: HashMap<i32, Vec<DbSaleItem>> = HashMap::new();
    if sale_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = sale_items::table
        .filter(sale_items::sale_id.eq_any(sale_ids))
        .order(sale_items::id.asc())
        .load::<DbSaleItem>(conn)?;

    for item in rows {
        grouped.entry(item.sale_id).or_default().push(item);
    }

    Ok(grouped)
}

impl SaleReader for DieselRepository {
    fn get_sale_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<DomainSale>> {
        use crate::schema::{sale_items, sales};

        let mut conn = self.conn()?;

        let Some(sale) = sales::table
            .filter(sales::id.eq(id))
            .filter(sales::store_id.eq(store_id))
            .first::<DbSale>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let items = sale_items::table
            .filter(sale_items::sale_id.eq(sale.id))
            .order(sale_items::id.asc())
            .load::<DbSaleItem>(&mut conn)?;

        Ok(Some(DomainSale::from((sale, items))))
    }

    fn list_sales(&self, query: SaleListQuery) -> RepositoryResult<(usize, Vec<DomainSale>)> {
        use crate::schema::sales;

        let mut conn = self.conn()?;

        let SaleListQuery {
            store_id,
            pagination,
        } = query;

        let total = sales::table
            .filter(sales::store_id.eq(store_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = sales::table
            .filter(sales::store_id.eq(store_id))
            .order(sales::id.desc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_sales = items.load::<DbSale>(&mut conn)?;
        let sale_ids: Vec<i32> = db_sales.iter().map(|sale| sale.id).collect();
        let mut items_by_sale = load_items_by_sale(&mut conn, &sale_ids)?;

        let sales = db_sales
            .into_iter()
            .map(|sale| {
                let items = items_by_sale.remove(&sale.id).unwrap_or_default();
                DomainSale::from((sale, items))
            })
            .collect();

        Ok((total, sales))
    }

    fn sales_stats(&self, store_id: i32, now: DateTime<Utc>) -> RepositoryResult<SalesStats> {
        use crate::schema::sales;

        let mut conn = self.conn()?;

        let (day_start, day_end) = day_window(now);
        let (month_start, month_end) = month_window(now);

        let today_value = sales::table
            .filter(sales::store_id.eq(store_id))
            .filter(sales::created_at.ge(day_start))
            .filter(sales::created_at.lt(day_end))
            .select(diesel::dsl::sql::<
                diesel::sql_types::Nullable<diesel::sql_types::BigInt>,
            >("SUM(total_cents)"))
            .get_result::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        let today_count = sales::table
            .filter(sales::store_id.eq(store_id))
            .filter(sales::created_at.ge(day_start))
            .filter(sales::created_at.lt(day_end))
            .count()
            .get_result::<i64>(&mut conn)?;

        let month_value = sales::table
            .filter(sales::store_id.eq(store_id))
            .filter(sales::created_at.ge(month_start))
            .filter(sales::created_at.lt(month_end))
            .select(diesel::dsl::sql::<
                diesel::sql_types::Nullable<diesel::sql_types::BigInt>,
            >("SUM(total_cents)"))
            .get_result::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        Ok(SalesStats {
            today_value_cents: today_value,
            today_count,
            month_value_cents: month_value,
        })
    }
}

impl SaleWriter for DieselRepository {
    fn create_sale(&self, new_sale: &DomainNewSale) -> RepositoryResult<DomainSale> {
        use crate::schema::{sale_items, sales};

        let mut conn = self.conn()?;

        conn.transaction::<DomainSale, RepositoryError, _>(|conn| {
            let number = sequence::allocate(conn, new_sale.store_id, DocumentKind::Sale)?;

            let mut snapshots = Vec::with_capacity(new_sale.lines.len());
            let mut total_cents = 0i64;
            for line in &new_sale.lines {
                let snapshot = stock::reserve(conn, new_sale.store_id, line.product_id, line.qty)?;
                total_cents += snapshot.line_total_cents;
                snapshots.push(snapshot);
            }

            let created: DbSale = diesel::insert_into(sales::table)
                .values(&DbNewSale {
                    store_id: new_sale.store_id,
                    number: Some(number.as_str()),
                    customer_name: new_sale.customer_name.as_deref(),
                    total_cents,
                    status: SALE_COMPLETED,
                })
                .get_result(conn)?;

            let payload: Vec<DbNewSaleItem> = snapshots
                .iter()
                .map(|line| DbNewSaleItem::from_line(created.id, line))
                .collect();
            diesel::insert_into(sale_items::table)
                .values(&payload)
                .execute(conn)?;

            Ok(created.into_domain(snapshots))
        })
    }
}
