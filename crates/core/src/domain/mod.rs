// Domain Layer - Pure business logic and entities

pub mod error;
pub mod isolation;
pub mod period;
pub mod subscription;

// Re-exports
pub use error::DomainError;
pub use isolation::IsolationLevel;
pub use period::{format_month, parse_month};
pub use subscription::{
    CreateSubscriptionRequest, ListFilter, Subscription, SubscriptionId, UpdateSubscriptionRequest,
};
