use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::item::LineItem;
use crate::models::product::Product as DbProduct;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Reserves `qty` units of a product and returns the immutable line snapshot
/// that gets persisted into the owning document.
///
/// Must run inside the enclosing document transaction: when a later line
/// fails, the rollback also undoes every decrement made here. Stock never
/// goes negative; a short line aborts the whole submission.
pub(crate) fn reserve(
    conn: &mut SqliteConnection,
    store_id: i32,
    product_id: i32,
    qty: i32,
) -> RepositoryResult<LineItem> {
    use crate::schema::products;

    let product = products::table
        .filter(products::id.eq(product_id))
        .filter(products::store_id.eq(store_id))
        .first::<DbProduct>(conn)
        .optional()?
        .ok_or(RepositoryError::ProductNotFound)?;

    if product.stock < qty {
        return Err(RepositoryError::InsufficientStock(product.name));
    }

    diesel::update(products::table.find(product.id))
        .set(products::stock.eq(products::stock - qty))
        .execute(conn)?;

    Ok(LineItem {
        line_total_cents: product.price_cents * i64::from(qty),
        product_name: product.name,
        qty,
        price_cents: product.price_cents,
    })
}
