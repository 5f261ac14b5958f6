use thiserror::Error;

/// Persistence-layer error taxonomy. Everything that can go wrong inside a
/// repository transaction; the whole transaction rolls back on any of these.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity does not exist within the caller's store.
    #[error("entity not found")]
    NotFound,
    /// The referenced store (tenant) does not exist.
    #[error("store not found")]
    StoreNotFound,
    /// A line item references a product outside the store, or one that does
    /// not exist. Aborts the whole submission.
    #[error("product not found")]
    ProductNotFound,
    /// A line item asked for more units than are on hand.
    #[error("insufficient stock for `{0}`")]
    InsufficientStock(String),
    /// Status input that is not part of the vocabulary.
    #[error("unknown status `{0}`")]
    InvalidStatus(String),
    /// A recognized status that the transition table rejects.
    #[error("transition from `{from}` to `{to}` is not allowed")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    /// A uniqueness rule was violated (duplicate store name, username, ...).
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
