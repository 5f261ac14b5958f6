use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::store::DocumentKind;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Allocates the next document number for a store.
///
/// The single `UPDATE ... RETURNING` both advances the counter and reads it
/// back, so concurrent allocations for the same store serialize on the store
/// row while different stores never contend. Must run inside the transaction
/// that persists the numbered document; a rollback takes the increment back
/// with it, which keeps the sequence gapless.
pub(crate) fn allocate(
    conn: &mut SqliteConnection,
    store_id: i32,
    kind: DocumentKind,
) -> RepositoryResult<String> {
    use crate::schema::stores;

    let advanced = match kind {
        DocumentKind::Order => diesel::update(stores::table.find(store_id))
            .set(stores::next_order_seq.eq(stores::next_order_seq + 1))
            .returning(stores::next_order_seq)
            .get_result::<i64>(conn),
        DocumentKind::Sale => diesel::update(stores::table.find(store_id))
            .set(stores::next_sale_seq.eq(stores::next_sale_seq + 1))
            .returning(stores::next_sale_seq)
            .get_result::<i64>(conn),
        DocumentKind::Tab => diesel::update(stores::table.find(store_id))
            .set(stores::next_tab_seq.eq(stores::next_tab_seq + 1))
            .returning(stores::next_tab_seq)
            .get_result::<i64>(conn),
    };

    let advanced = advanced
        .optional()?
        .ok_or(RepositoryError::StoreNotFound)?;

    // The counter holds the *next* value; the allocated number is the one
    // before the increment.
    Ok(kind.format_number(advanced - 1))
}
