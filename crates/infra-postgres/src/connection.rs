// PostgreSQL Connection Pool Setup

use crate::error::map_sqlx_error;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use subscription_core::port::StorageResult;
use tracing::info;

/// Pool sizing and connection lifetimes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 25,
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(300),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Create a PostgreSQL connection pool and verify it with a round trip
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> StorageResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
        .map_err(map_sqlx_error)?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(map_sqlx_error)?;

    info!(
        max_connections = config.max_connections,
        "PostgreSQL pool ready"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.idle_timeout, Duration::from_secs(600));
        assert_eq!(config.max_lifetime, Duration::from_secs(300));
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn test_create_pool() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let pool = create_pool(&url, &PoolConfig::default()).await.unwrap();
        assert!(pool.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_create_pool_unreachable_is_database_error() {
        let config = PoolConfig {
            acquire_timeout: Duration::from_millis(200),
            ..PoolConfig::default()
        };
        let err = create_pool("postgres://nobody@127.0.0.1:1/none", &config)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            subscription_core::port::StorageError::Database(_)
        ));
    }
}
