use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("round conflict: expected {expected}, store has {actual}")]
    Conflict { expected: u64, actual: u64 },

    #[error("ledger has not been initialised")]
    NotInitialized,

    #[error("ledger is already initialised")]
    AlreadyInitialized,

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}
