// PostgreSQL Transaction Implementation

use crate::error::map_sqlx_error;
use crate::queries::update_subscription;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction as SqlxTransaction};
use subscription_core::domain::{IsolationLevel, UpdateSubscriptionRequest};
use subscription_core::port::{
    StorageResult, SubscriptionTransaction, Transaction, TransactionController,
};
use tracing::debug;

/// Opens read-write transactions at a requested isolation level
pub struct PgTransactionController {
    pool: PgPool,
}

impl PgTransactionController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn set_isolation_sql(isolation: IsolationLevel) -> &'static str {
    match isolation {
        IsolationLevel::RepeatableRead => "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ WRITE",
        IsolationLevel::Serializable => "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE, READ WRITE",
    }
}

#[async_trait]
impl TransactionController for PgTransactionController {
    async fn begin_tx(
        &self,
        isolation: IsolationLevel,
    ) -> StorageResult<Box<dyn SubscriptionTransaction>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // Must be the first statement of the transaction
        sqlx::query(set_isolation_sql(isolation))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        debug!(isolation = %isolation, "Transaction opened");
        Ok(Box::new(PgSubscriptionTransaction::new(tx)))
    }
}

/// An open transaction. Dropping it unresolved rolls back.
pub struct PgSubscriptionTransaction {
    tx: SqlxTransaction<'static, Postgres>,
}

impl PgSubscriptionTransaction {
    pub fn new(tx: SqlxTransaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for PgSubscriptionTransaction {
    async fn commit(self: Box<Self>) -> StorageResult<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self: Box<Self>) -> StorageResult<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl SubscriptionTransaction for PgSubscriptionTransaction {
    async fn update(&mut self, req: &UpdateSubscriptionRequest) -> StorageResult<()> {
        update_subscription(&mut *self.tx, req).await
    }
}
