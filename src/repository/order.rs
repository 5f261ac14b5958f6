use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery, OrderStatus,
};
use crate::domain::sale::Sale as DomainSale;
use crate::domain::store::DocumentKind;
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
    OrderItem as DbOrderItem,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, OrderReader, OrderWriter, convert, sequence, stock};

fn load_order_with_items(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> RepositoryResult<DomainOrder> {
    use crate::schema::{order_items, orders};

    let order = orders::table
        .find(order_id)
        .first::<DbOrder>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    let items = order_items::table
        .filter(order_items::order_id.eq(order.id))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)?;

    Ok(DomainOrder::from((order, items)))
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32, store_id: i32) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let Some(order) = orders::table
            .filter(orders::id.eq(id))
            .filter(orders::store_id.eq(store_id))
            .first::<DbOrder>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let items = order_items::table
            .filter(order_items::order_id.eq(order.id))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        Ok(Some(DomainOrder::from((order, items))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let OrderListQuery {
            store_id,
            status,
            pagination,
        } = query;

        let status_filter = status.map(OrderStatus::as_str);

        let mut count_query = orders::table
            .filter(orders::store_id.eq(store_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(status_value) = status_filter {
            count_query = count_query.filter(orders::status.eq(status_value));
        }
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = orders::table
            .filter(orders::store_id.eq(store_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(status_value) = status_filter {
            items = items.filter(orders::status.eq(status_value));
        }
        items = items.order(orders::id.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_orders = items.load::<DbOrder>(&mut conn)?;
        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();

        let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
        if !order_ids.is_empty() {
            let rows = order_items::table
                .filter(order_items::order_id.eq_any(&order_ids))
                .order(order_items::id.asc())
                .load::<DbOrderItem>(&mut conn)?;
            for item in rows {
                items_by_order.entry(item.order_id).or_default().push(item);
            }
        }

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                DomainOrder::from((order, items))
            })
            .collect();

        Ok((total, orders))
    }

    fn count_open_orders(&self, store_id: i32) -> RepositoryResult<i64> {
        use crate::schema::orders;

        let mut conn = self.conn()?;
        let open: Vec<&str> = OrderStatus::OPEN.iter().map(|s| s.as_str()).collect();

        let count = orders::table
            .filter(orders::store_id.eq(store_id))
            .filter(orders::status.eq_any(open))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count)
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let number = sequence::allocate(conn, new_order.store_id, DocumentKind::Order)?;

            // Stock is reserved now, at creation; delivery later never
            // touches it again. Any failing line rolls back the lot.
            let mut snapshots = Vec::with_capacity(new_order.lines.len());
            let mut total_cents = 0i64;
            for line in &new_order.lines {
                let snapshot =
                    stock::reserve(conn, new_order.store_id, line.product_id, line.qty)?;
                total_cents += snapshot.line_total_cents;
                snapshots.push(snapshot);
            }

            let created: DbOrder = diesel::insert_into(orders::table)
                .values(&DbNewOrder {
                    store_id: new_order.store_id,
                    number: Some(number.as_str()),
                    customer_name: new_order.customer_name.as_deref(),
                    status: OrderStatus::Novo.as_str(),
                    total_cents,
                })
                .get_result(conn)?;

            let payload: Vec<DbNewOrderItem> = snapshots
                .iter()
                .map(|line| DbNewOrderItem::from_line(created.id, line))
                .collect();
            diesel::insert_into(order_items::table)
                .values(&payload)
                .execute(conn)?;

            Ok(created.into_domain(snapshots))
        })
    }

    fn set_order_status(
        &self,
        order_id: i32,
        store_id: i32,
        new_status: OrderStatus,
    ) -> RepositoryResult<(DomainOrder, Option<DomainSale>)> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        conn.transaction::<(DomainOrder, Option<DomainSale>), RepositoryError, _>(|conn| {
            let order = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::store_id.eq(store_id))
                .first::<DbOrder>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let current = OrderStatus::from(order.status.as_str());

            // Redelivering a delivered order is a no-op that hands back the
            // sale it already produced.
            if new_status == OrderStatus::Entregue
                && (current == OrderStatus::Entregue || order.converted_sale_id.is_some())
            {
                let sale = convert::order_to_sale(conn, &order)?;
                return Ok((load_order_with_items(conn, order.id)?, Some(sale)));
            }

            if !current.can_transition(new_status) {
                return Err(RepositoryError::InvalidTransition {
                    from: current.as_str(),
                    to: new_status.as_str(),
                });
            }

            diesel::update(orders::table.find(order.id))
                .set(orders::status.eq(new_status.as_str()))
                .execute(conn)?;

            // Delivery converts in the same transaction; the transition and
            // the sale commit or roll back together.
            let sale = if new_status == OrderStatus::Entregue {
                Some(convert::order_to_sale(conn, &order)?)
            } else {
                None
            };

            Ok((load_order_with_items(conn, order.id)?, sale))
        })
    }
}
