// sqlx::Error → StorageError classification

use subscription_core::port::StorageError;

// PostgreSQL SQLSTATE codes: https://www.postgresql.org/docs/current/errcodes-appendix.html
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const INTEGRITY_CONSTRAINT_CLASS: &str = "23";

/// Convert sqlx::Error to StorageError
///
/// - `RowNotFound` → `NotFound`
/// - `40001` / `40P01` → `TransactionFailure` (replayable)
/// - class `23` (any integrity constraint) → `AlreadyExists`
/// - everything else (connection, pool, protocol) → `Database`
pub fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        sqlx::Error::Database(db_err) => {
            classify_sqlstate(db_err.code().as_deref(), db_err.message())
        }
        other => StorageError::Database(other.to_string()),
    }
}

fn classify_sqlstate(code: Option<&str>, message: &str) -> StorageError {
    match code {
        Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
            StorageError::TransactionFailure(message.to_string())
        }
        Some(c) if c.starts_with(INTEGRITY_CONSTRAINT_CLASS) => StorageError::AlreadyExists,
        Some(c) => StorageError::Database(format!("[{}] {}", c, message)),
        None => StorageError::Database(message.to_string()),
    }
}
