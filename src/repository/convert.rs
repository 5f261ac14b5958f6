use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::sale::{SALE_COMPLETED, Sale as DomainSale};
use crate::domain::store::DocumentKind;
use crate::models::order::{Order as DbOrder, OrderItem as DbOrderItem};
use crate::models::sale::{NewSale as DbNewSale, Sale as DbSale, SaleItem as DbSaleItem};
use crate::models::tab::{Tab as DbTab, TabItem as DbTabItem};
use crate::repository::errors::RepositoryResult;
use crate::repository::sequence;

/// Materializes the sale for a delivered order, exactly once.
///
/// When the order already carries a `converted_sale_id` the referenced sale
/// is returned unchanged. If that sale row is gone (a consistency violation)
/// a replacement is created rather than leaving the order unrecoverable.
/// Runs inside the status-transition transaction, so the conversion and the
/// transition commit together.
pub(crate) fn order_to_sale(
    conn: &mut SqliteConnection,
    order: &DbOrder,
) -> RepositoryResult<DomainSale> {
    use crate::schema::{order_items, orders};

    if let Some(sale_id) = order.converted_sale_id {
        match load_sale(conn, sale_id)? {
            Some(sale) => return Ok(sale),
            None => log::warn!(
                "order {} references missing sale {}; creating a replacement",
                order.id,
                sale_id
            ),
        }
    }

    let lines: Vec<(String, i32, i64, i64)> = order_items::table
        .filter(order_items::order_id.eq(order.id))
        .order(order_items::id.asc())
        .load::<DbOrderItem>(conn)?
        .into_iter()
        .map(|item| {
            (
                item.product_name,
                item.qty,
                item.price_cents,
                item.line_total_cents,
            )
        })
        .collect();

    let sale = insert_sale(
        conn,
        order.store_id,
        order.customer_name.as_deref(),
        order.total_cents,
        &lines,
    )?;

    diesel::update(orders::table.find(order.id))
        .set(orders::converted_sale_id.eq(sale.id))
        .execute(conn)?;

    Ok(sale)
}

/// Materializes the sale for a closed tab, exactly once. Mirrors
/// [`order_to_sale`]; the table name stands in for the customer name.
pub(crate) fn tab_to_sale(conn: &mut SqliteConnection, tab: &DbTab) -> RepositoryResult<DomainSale> {
    use crate::schema::{tab_items, tabs};

    if let Some(sale_id) = tab.converted_sale_id {
        match load_sale(conn, sale_id)? {
            Some(sale) => return Ok(sale),
            None => log::warn!(
                "tab {} references missing sale {}; creating a replacement",
                tab.id,
                sale_id
            ),
        }
    }

    let lines: Vec<(String, i32, i64, i64)> = tab_items::table
        .filter(tab_items::tab_id.eq(tab.id))
        .order(tab_items::id.asc())
        .load::<DbTabItem>(conn)?
        .into_iter()
        .map(|item| {
            (
                item.product_name,
                item.qty,
                item.price_cents,
                item.line_total_cents,
            )
        })
        .collect();

    let sale = insert_sale(
        conn,
        tab.store_id,
        Some(tab.table_name.as_str()),
        tab.total_cents,
        &lines,
    )?;

    diesel::update(tabs::table.find(tab.id))
        .set(tabs::converted_sale_id.eq(sale.id))
        .execute(conn)?;

    Ok(sale)
}

/// Writes the sale row and its line items. The total is copied from the
/// source document, not recomputed; line items are copied verbatim. Stock
/// was already reserved when the source document was created.
fn insert_sale(
    conn: &mut SqliteConnection,
    store_id: i32,
    customer_name: Option<&str>,
    total_cents: i64,
    lines: &[(String, i32, i64, i64)],
) -> RepositoryResult<DomainSale> {
    use crate::schema::{sale_items, sales};

    let number = sequence::allocate(conn, store_id, DocumentKind::Sale)?;

    let sale: DbSale = diesel::insert_into(sales::table)
        .values(&DbNewSale {
            store_id,
            number: Some(number.as_str()),
            customer_name,
            total_cents,
            status: SALE_COMPLETED,
        })
        .get_result(conn)?;

    for (product_name, qty, price_cents, line_total_cents) in lines {
        diesel::insert_into(sale_items::table)
            .values((
                sale_items::sale_id.eq(sale.id),
                sale_items::product_name.eq(product_name),
                sale_items::qty.eq(qty),
                sale_items::price_cents.eq(price_cents),
                sale_items::line_total_cents.eq(line_total_cents),
            ))
            .execute(conn)?;
    }

    load_sale(conn, sale.id)?.ok_or(crate::repository::errors::RepositoryError::NotFound)
}

pub(crate) fn load_sale(
    conn: &mut SqliteConnection,
    sale_id: i32,
) -> RepositoryResult<Option<DomainSale>> {
    use crate::schema::{sale_items, sales};

    let Some(sale) = sales::table
        .find(sale_id)
        .first::<DbSale>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let items = sale_items::table
        .filter(sale_items::sale_id.eq(sale.id))
        .order(sale_items::id.asc())
        .load::<DbSaleItem>(conn)?;

    Ok(Some(DomainSale::from((sale, items))))
}
