//! Subscription Service - Main Entry Point
//! REST API over PostgreSQL with retrying transactional updates

mod config;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use config::{AppConfig, LogFormat};
use subscription_api_http::{router, serve};
use subscription_core::application::{SubscriptionService, TxRetryPolicy};
use subscription_core::port::id_provider::UuidProvider;
use subscription_core::port::time_provider::SystemTimeProvider;
use subscription_infra_postgres::{
    create_pool, run_migrations, PgSubscriptionRepository, PgTransactionController,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = AppConfig::from_env().context("Invalid configuration")?;

    // 2. Initialize logging
    init_tracing(&config)?;
    info!("Subscription service v{} starting...", VERSION);

    // 3. Initialize database
    info!(addr = %config.server_addr, "Initializing database...");
    let pool = create_pool(&config.database_url, &config.pool)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let service = Arc::new(SubscriptionService::new(
        Arc::new(PgSubscriptionRepository::new(pool.clone())),
        Arc::new(PgTransactionController::new(pool.clone())),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        TxRetryPolicy::default(),
    ));

    // 5. Start HTTP server
    let listener = TcpListener::bind(config.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_addr))?;
    let app = router(service, config.request_timeout);

    info!("System ready. Press Ctrl+C to shutdown");
    serve(listener, app, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    // 6. Graceful shutdown
    pool.close().await;
    info!("Shutdown complete.");

    Ok(())
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.default_log_filter()))
        .context("Failed to create env filter")?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.log_format {
        // Production: JSON structured logging
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    };
    result.context("Failed to initialize logging")
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown"),
        _ = terminate => info!("Received SIGTERM, starting shutdown"),
    }
}
