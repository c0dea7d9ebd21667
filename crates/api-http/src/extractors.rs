//! Path extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::ApiError;

/// `{id}` path segment of `/subscriptions/{id}`, parsed as a UUID
pub struct SubscriptionIdPath(pub Uuid);

impl SubscriptionIdPath {
    /// Canonical hyphenated form, as stored
    pub fn as_id(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl<S> FromRequestParts<S> for SubscriptionIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest("invalid id '', expected UUID".to_string()))?;

        parse_id(&raw).map(Self)
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("invalid id '{}', expected UUID", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_any_uuid_spelling() {
        let id = parse_id("7A6F1B0E5D4C4B3A9F8E1D2C3B4A5F60").unwrap();
        assert_eq!(
            SubscriptionIdPath(id).as_id(),
            "7a6f1b0e-5d4c-4b3a-9f8e-1d2c3b4a5f60"
        );
    }

    #[test]
    fn parse_id_error_names_input_and_format() {
        match parse_id("abc") {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "invalid id 'abc', expected UUID"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
