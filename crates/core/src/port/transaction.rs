// Transaction port for atomic operations

use crate::domain::{IsolationLevel, UpdateSubscriptionRequest};
use crate::port::StorageResult;
use async_trait::async_trait;

/// Transaction handle. Both methods consume the handle, so it is resolved at most once.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> StorageResult<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> StorageResult<()>;
}

/// Subscription writes within a transaction
#[async_trait]
pub trait SubscriptionTransaction: Transaction {
    /// Update subscription (within transaction)
    async fn update(&mut self, req: &UpdateSubscriptionRequest) -> StorageResult<()>;
}

/// Opens read-write transactions at a requested isolation level
#[async_trait]
pub trait TransactionController: Send + Sync {
    /// Begin a new transaction
    async fn begin_tx(
        &self,
        isolation: IsolationLevel,
    ) -> StorageResult<Box<dyn SubscriptionTransaction>>;
}
