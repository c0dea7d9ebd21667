// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("subscription not found: {0}")]
    SubscriptionNotFound(String),

    #[error("subscription already exists")]
    SubscriptionAlreadyExists,

    #[error("invalid subscription data: {0}")]
    InvalidSubscription(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
