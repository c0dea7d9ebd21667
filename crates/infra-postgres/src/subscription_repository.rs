// PostgreSQL SubscriptionRepository Implementation

use crate::error::map_sqlx_error;
use crate::queries::{list_query, sum_query, update_subscription};
use crate::row::SubscriptionRow;
use async_trait::async_trait;
use sqlx::PgPool;
use subscription_core::domain::{ListFilter, Subscription, UpdateSubscriptionRequest};
use subscription_core::port::{StorageError, StorageResult, SubscriptionRepository};
use tracing::debug;

pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, subscription: &Subscription) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, service_name, price, user_id,
                start_date, end_date, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&subscription.id)
        .bind(&subscription.title)
        .bind(subscription.price)
        .bind(&subscription.user_id)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.created_at)
        .bind(subscription.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Subscription> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, service_name, price, user_id, start_date, end_date, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(SubscriptionRow::into_subscription)
            .ok_or(StorageError::NotFound)
    }

    async fn update(&self, req: &UpdateSubscriptionRequest) -> StorageResult<()> {
        update_subscription(&self.pool, req).await
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, filter: &ListFilter) -> StorageResult<Vec<Subscription>> {
        let mut qb = list_query(filter);
        let rows = qb
            .build_query_as::<SubscriptionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(rows = rows.len(), "Subscriptions fetched");
        Ok(rows
            .into_iter()
            .map(SubscriptionRow::into_subscription)
            .collect())
    }

    async fn sum(&self, filter: &ListFilter) -> StorageResult<i64> {
        let mut qb = sum_query(filter);
        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
