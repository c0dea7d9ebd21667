// Migration Runner

use crate::error::map_sqlx_error;
use sqlx::{PgConnection, PgPool};
use subscription_core::port::StorageResult;
use tracing::info;

/// (version, description, sql) applied in ascending order
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "Subscriptions schema",
    include_str!("../migrations/001_create_subscriptions.sql"),
)];

/// Advisory lock key held while a migration is applied (ASCII "subsmigr")
const MIGRATION_LOCK_KEY: i64 = 0x7375_6273_6d69_6772;

const SCHEMA_VERSION_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
     WHERE table_schema = current_schema() AND table_name = 'schema_version')";

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> StorageResult<()> {
    info!("Running database migrations...");

    let mut conn = pool.acquire().await.map_err(map_sqlx_error)?;
    let current_version = schema_version(&mut *conn).await?;
    drop(conn);

    info!(current_version, "Current schema version");

    for (version, description, sql) in MIGRATIONS {
        if current_version < *version && apply_migration(pool, *version, sql).await? {
            info!(version, description, "Applied migration");
        }
    }

    info!("All migrations applied successfully");
    Ok(())
}

/// Highest applied version, 0 on a fresh database
async fn schema_version(conn: &mut PgConnection) -> StorageResult<i64> {
    let table_exists: bool = sqlx::query_scalar(SCHEMA_VERSION_EXISTS)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

    if !table_exists {
        return Ok(0);
    }

    let version = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(version) FROM schema_version")
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    Ok(version.unwrap_or(0))
}

/// Apply a single migration file inside one transaction.
///
/// Concurrent runners serialize on an advisory lock; a runner that finds the
/// version already applied once it holds the lock returns `false`.
async fn apply_migration(pool: &PgPool, version: i64, sql: &str) -> StorageResult<bool> {
    let mut tx = pool.begin().await.map_err(map_sqlx_error)?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

    if schema_version(&mut *tx).await? >= version {
        tx.rollback().await.map_err(map_sqlx_error)?;
        return Ok(false);
    }

    for statement in split_statements(sql) {
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
    }

    tx.commit().await.map_err(map_sqlx_error)?;
    Ok(true)
}

/// Split on `;` and drop `--` comment lines and empty statements
fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|statement| {
            statement
                .lines()
                .filter(|line| !line.trim().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}
