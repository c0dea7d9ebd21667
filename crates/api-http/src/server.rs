//! Axum server setup
//!
//! - Tracing middleware
//! - Per-request deadline (the handler future is dropped on expiry and a 500 is returned)
//! - Graceful shutdown driven by the caller

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::{BoxError, Router};
use subscription_core::application::SubscriptionService;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::routes;

/// Server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Deadline applied to every request (default: 15s)
    pub request_timeout: Duration,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub service: Arc<SubscriptionService>,
}

/// Build the application router with middleware applied.
pub fn router(service: Arc<SubscriptionService>, request_timeout: Duration) -> Router {
    let state = AppState { service };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::subscriptions::router())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Errors raised by the middleware stack, rendered like handler errors
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Internal("request deadline exceeded".to_string())
    } else {
        ApiError::Internal(format!("unhandled middleware error: {}", err))
    }
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
///
/// # Example
///
/// ```ignore
/// let listener = TcpListener::bind(config.bind_addr).await?;
/// serve(listener, router(service, config.request_timeout), shutdown_signal()).await?;
/// ```
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server shutdown complete");
    Ok(())
}
