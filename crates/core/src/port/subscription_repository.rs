// Subscription Repository Port (Interface)

use crate::domain::{ListFilter, Subscription, UpdateSubscriptionRequest};
use crate::port::StorageResult;
use async_trait::async_trait;

/// Repository interface for Subscription persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a new subscription (`AlreadyExists` on any constraint violation)
    async fn create(&self, subscription: &Subscription) -> StorageResult<()>;

    /// Find subscription by ID (`NotFound` when missing)
    async fn get(&self, id: &str) -> StorageResult<Subscription>;

    /// Update mutable fields outside of an explicit transaction
    async fn update(&self, req: &UpdateSubscriptionRequest) -> StorageResult<()>;

    /// Delete by ID (`NotFound` when nothing was deleted)
    async fn delete(&self, id: &str) -> StorageResult<()>;

    /// Filtered, optionally paginated listing
    async fn list(&self, filter: &ListFilter) -> StorageResult<Vec<Subscription>>;

    /// Sum of prices over the filter predicates (pagination ignored)
    async fn sum(&self, filter: &ListFilter) -> StorageResult<i64>;
}
