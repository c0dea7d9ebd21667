//! REST API for the subscription service
//!
//! Thin adapter over `SubscriptionService`: parses and validates requests,
//! delegates to the use case, and maps errors to HTTP status codes.

mod error;
mod extractors;
pub mod routes;
mod server;
mod types;

#[cfg(test)]
mod test_support;

pub use error::ApiError;
pub use extractors::SubscriptionIdPath;
pub use server::{router, serve, AppState, HttpServerConfig};
pub use types::{
    AggregationResult, CreateSubscriptionBody, ListParams, SubscriptionResponse, SumParams,
    UpdateSubscriptionBody,
};
