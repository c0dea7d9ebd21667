// Storage-level error signals reported by adapters

use thiserror::Error;

/// Raw outcome classes an adapter reports. No retry decisions happen here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("no rows")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    /// Serialization conflict or deadlock; safe to replay in a new transaction
    #[error("transaction failure: {0}")]
    TransactionFailure(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
