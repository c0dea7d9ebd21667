// Central Error Type for the Application

use thiserror::Error;

use crate::domain::DomainError;
use crate::port::StorageError;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage failure wrapped with the operation that hit it
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        source: StorageError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn storage(context: &'static str, source: StorageError) -> Self {
        AppError::Storage { context, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::SubscriptionNotFound(_)))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::SubscriptionAlreadyExists))
    }

    /// True for a storage conflict that a fresh transaction may resolve
    pub fn is_transaction_failure(&self) -> bool {
        matches!(
            self,
            AppError::Storage {
                source: StorageError::TransactionFailure(_),
                ..
            }
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
