use thiserror::Error;

/// Errors raised by movie and review store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// Any other backend failure (connection, query, poisoned lock, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}
