// Subscription Service - Core use cases for subscription management

mod update;


use crate::application::retry::TxRetryPolicy;
use crate::domain::{
    CreateSubscriptionRequest, DomainError, ListFilter, Subscription, UpdateSubscriptionRequest,
};
use crate::error::{AppError, Result};
use crate::port::{
    IdProvider, StorageError, SubscriptionRepository, TimeProvider, TransactionController,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Subscription use cases (create/read/update/delete/list/sum)
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
    tx_controller: Arc<dyn TransactionController>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    retry_policy: TxRetryPolicy,
}

impl SubscriptionService {
    pub fn new(
        repo: Arc<dyn SubscriptionRepository>,
        tx_controller: Arc<dyn TransactionController>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        retry_policy: TxRetryPolicy,
    ) -> Self {
        Self {
            repo,
            tx_controller,
            id_provider,
            time_provider,
            retry_policy,
        }
    }

    pub fn retry_policy(&self) -> &TxRetryPolicy {
        &self.retry_policy
    }

    /// Create a subscription with a freshly generated ID. Never retried.
    pub async fn create(&self, req: CreateSubscriptionRequest) -> Result<Subscription> {
        req.validate()?;

        let id = self.id_provider.generate_id();
        let now = self.time_provider.now_millis();
        let subscription = Subscription::from_request(id, now, req);

        match self.repo.create(&subscription).await {
            Ok(()) => {
                info!(
                    subscription_id = %subscription.id,
                    user_id = %subscription.user_id,
                    "Subscription created"
                );
                Ok(subscription)
            }
            Err(StorageError::AlreadyExists) => Err(DomainError::SubscriptionAlreadyExists.into()),
            Err(e) => Err(AppError::storage("create subscription", e)),
        }
    }

    pub async fn read(&self, id: &str) -> Result<Subscription> {
        self.repo
            .get(id)
            .await
            .map_err(|e| not_found_or(e, id, "get subscription"))
    }

    /// Update inside a RepeatableRead transaction, replaying on serialization conflicts.
    pub async fn update(&self, mut req: UpdateSubscriptionRequest) -> Result<()> {
        req.validate()?;
        req.updated_at = self.time_provider.now_millis();

        let req = &req;
        self.retry_policy
            .run("update subscription", move |attempt| {
                self.try_update(req, attempt)
            })
            .await?;

        info!(subscription_id = %req.id, "Subscription updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| not_found_or(e, id, "delete subscription"))?;

        info!(subscription_id = %id, "Subscription deleted");
        Ok(())
    }

    /// An empty result is not an error
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>> {
        let subs = self
            .repo
            .list(filter)
            .await
            .map_err(|e| AppError::storage("list subscriptions", e))?;

        debug!(count = subs.len(), "Listed subscriptions");
        Ok(subs)
    }

    /// Zero when nothing matches
    pub async fn sum(&self, filter: &ListFilter) -> Result<i64> {
        self.repo
            .sum(&filter.without_pagination())
            .await
            .map_err(|e| AppError::storage("sum subscriptions", e))
    }
}

fn not_found_or(err: StorageError, id: &str, context: &'static str) -> AppError {
    match err {
        StorageError::NotFound => DomainError::SubscriptionNotFound(id.to_string()).into(),
        other => AppError::storage(context, other),
    }
}
