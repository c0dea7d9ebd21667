// Subscription Infrastructure - PostgreSQL Adapter
// Implements: SubscriptionRepository, TransactionController

mod connection;
mod error;
mod migration;
mod queries;
mod row;
mod subscription_repository;
mod transaction;

pub use connection::{create_pool, PoolConfig};
pub use error::map_sqlx_error;
pub use migration::run_migrations;
pub use subscription_repository::PgSubscriptionRepository;
pub use transaction::{PgSubscriptionTransaction, PgTransactionController};

// Note: sqlx::Error conversion lives in a helper function because of the
// orphan rule (no From<sqlx::Error> for StorageError in this crate)
