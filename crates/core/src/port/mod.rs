// Port Layer - Interfaces for external dependencies

pub mod error;
pub mod id_provider; // For deterministic testing
pub mod subscription_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use error::{StorageError, StorageResult};
pub use id_provider::IdProvider;
pub use subscription_repository::SubscriptionRepository;
pub use time_provider::TimeProvider;
pub use transaction::{SubscriptionTransaction, Transaction, TransactionController};
