// Daemon configuration from environment variables

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use subscription_core::AppError;
use subscription_infra_postgres::PoolConfig;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Production: JSON structured logging
    Json,
    /// Development: human-readable output
    Pretty,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: SocketAddr,
    pub database_url: String,
    pub pool: PoolConfig,
    pub request_timeout: Duration,
    pub debug: bool,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults,
    /// malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PoolConfig::default();

        let server_addr: SocketAddr = parse_or(&lookup, "SERVER_ADDR", DEFAULT_SERVER_ADDR.parse().ok())?;
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        let pool = PoolConfig {
            max_connections: parse_or(&lookup, "DB_MAX_OPEN_CONNS", Some(defaults.max_connections))?,
            idle_timeout: secs_or(&lookup, "DB_MAX_IDLE_TIME_SECS", defaults.idle_timeout)?,
            max_lifetime: secs_or(&lookup, "DB_MAX_LIFETIME_SECS", defaults.max_lifetime)?,
            acquire_timeout: secs_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout)?,
        };
        if pool.max_connections == 0 {
            return Err(AppError::Config(
                "DB_MAX_OPEN_CONNS must be at least 1".to_string(),
            ));
        }

        let request_timeout = secs_or(
            &lookup,
            "HTTP_REQUEST_TIMEOUT_SECS",
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )?;

        let debug: bool = parse_or(&lookup, "DEBUG", Some(false))?;
        let log_format = match lookup("SUBSCRIPTION_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            server_addr,
            database_url,
            pool,
            request_timeout,
            debug,
            log_format,
        })
    }

    /// Default log filter when RUST_LOG is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "subscription=debug"
        } else {
            "subscription=info"
        }
    }
}

fn database_url_from_parts<F>(lookup: &F) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DATABASE_HOST").unwrap_or_else(|| "localhost".to_string());
    let port: u16 = parse_or(lookup, "DATABASE_PORT", Some(5432))?;
    let user = lookup("DATABASE_USER").unwrap_or_else(|| "postgres".to_string());
    let password = lookup("DATABASE_PASSWORD").unwrap_or_default();
    let name = lookup("DATABASE_NAME").unwrap_or_else(|| "subscriptions".to_string());

    let credentials = if password.is_empty() {
        user
    } else {
        format!("{}:{}", user, password)
    };
    Ok(format!(
        "postgres://{}@{}:{}/{}",
        credentials, host, port, name
    ))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: Option<T>) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("invalid value for {}: '{}'", key, raw))),
        None => default.ok_or_else(|| AppError::Config(format!("{} is required", key))),
    }
}

fn secs_or<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_or(lookup, key, Some(default.as_secs())).map(Duration::from_secs)
}
