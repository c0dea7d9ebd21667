//! API error type with IntoResponse
//!
//! Every error renders as `{"errors": "<message>"}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use subscription_core::domain::DomainError;
use subscription_core::AppError;

/// API error with HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Malformed input, failed validation or duplicate (400)
    BadRequest(String),

    /// Resource not found (404)
    NotFound(String),

    /// Anything else (500, logged)
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg,
            Self::Internal(msg) => {
                // Log the actual error, return generic message
                tracing::error!(error = %msg, "Request failed");
                "internal server error".to_string()
            }
        };

        (status, Json(json!({ "errors": message }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match &err {
            AppError::Domain(DomainError::SubscriptionNotFound(_)) => {
                Self::NotFound(err.to_string())
            }
            AppError::Domain(_) | AppError::Validation(_) => Self::BadRequest(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        AppError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
