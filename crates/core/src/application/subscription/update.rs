// Single transactional update attempt

use super::SubscriptionService;
use crate::application::retry::RetryError;
use crate::domain::{DomainError, IsolationLevel, UpdateSubscriptionRequest};
use crate::error::AppError;
use crate::port::{StorageError, SubscriptionTransaction};
use tracing::{debug, error};

/// Isolation used for every update transaction
pub(crate) const UPDATE_ISOLATION: IsolationLevel = IsolationLevel::RepeatableRead;

impl SubscriptionService {
    /// One attempt: begin, update, then commit or roll back.
    ///
    /// Only a transaction failure from the update itself is transient.
    /// Begin and commit failures are permanent.
    pub(super) async fn try_update(
        &self,
        req: &UpdateSubscriptionRequest,
        attempt: u32,
    ) -> Result<(), RetryError> {
        let mut tx = self
            .tx_controller
            .begin_tx(UPDATE_ISOLATION)
            .await
            .map_err(|e| RetryError::Permanent(AppError::storage("begin update transaction", e)))?;

        debug!(subscription_id = %req.id, attempt, isolation = %UPDATE_ISOLATION, "Transaction started");

        match tx.update(req).await {
            Ok(()) => tx.commit().await.map_err(|e| {
                RetryError::Permanent(AppError::storage("commit update transaction", e))
            }),
            Err(err) => {
                rollback_quietly(tx, &req.id).await;
                Err(classify_update_error(err, &req.id))
            }
        }
    }
}

fn classify_update_error(err: StorageError, id: &str) -> RetryError {
    match err {
        StorageError::AlreadyExists => {
            RetryError::Permanent(DomainError::SubscriptionAlreadyExists.into())
        }
        StorageError::NotFound => {
            RetryError::Permanent(DomainError::SubscriptionNotFound(id.to_string()).into())
        }
        e @ StorageError::TransactionFailure(_) => {
            RetryError::Transient(AppError::storage("update subscription", e))
        }
        e => RetryError::Permanent(AppError::storage("update subscription", e)),
    }
}

/// Rollback failures are logged and never replace the original error.
async fn rollback_quietly(tx: Box<dyn SubscriptionTransaction>, id: &str) {
    if let Err(e) = tx.rollback().await {
        error!(subscription_id = %id, error = %e, "Transaction rollback failed");
    }
}
