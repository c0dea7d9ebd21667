//! Subscription Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    AggregationResult, ErrorBody, NewSubscription, Subscription, SubscriptionQuery,
    SubscriptionUpdate,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Subscription Service Client
///
/// # Example
///
/// ```no_run
/// use subscription_sdk::SubscriptionClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SubscriptionClient::new("http://127.0.0.1:8080")?;
/// let sub = client.get("6f1c2a9e-3b4d-4e5f-8a7b-9c0d1e2f3a4b").await?;
/// println!("{} costs {}", sub.service_name, sub.price);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SubscriptionClient {
    http: Client,
    base_url: String,
}

impl SubscriptionClient {
    /// Create a client for the service at `base_url` (e.g. `http://127.0.0.1:8080`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a subscription and return it with its generated id
    pub async fn create(&self, subscription: &NewSubscription) -> Result<Subscription> {
        let response = self
            .http
            .post(self.url("/subscriptions"))
            .json(subscription)
            .send()
            .await?;

        parse_json(response).await
    }

    pub async fn get(&self, id: &str) -> Result<Subscription> {
        let response = self
            .http
            .get(self.url(&format!("/subscriptions/{}", id)))
            .send()
            .await?;

        parse_json(response).await
    }

    pub async fn update(&self, id: &str, update: &SubscriptionUpdate) -> Result<()> {
        let response = self
            .http
            .put(self.url(&format!("/subscriptions/{}", id)))
            .json(update)
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/subscriptions/{}", id)))
            .send()
            .await?;

        check_status(response).await.map(|_| ())
    }

    /// List subscriptions matching `query`, ordered by creation time
    pub async fn list(&self, query: &SubscriptionQuery) -> Result<Vec<Subscription>> {
        let response = self
            .http
            .get(self.url("/subscriptions"))
            .query(query)
            .send()
            .await?;

        parse_json(response).await
    }

    /// Total price of subscriptions matching `query` (pagination is ignored)
    pub async fn sum(&self, query: &SubscriptionQuery) -> Result<i64> {
        let response = self
            .http
            .get(self.url("/subscriptions/sum"))
            .query(&query.without_pagination())
            .send()
            .await?;

        let result: AggregationResult = parse_json(response).await?;
        Ok(result.total_cost)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.errors)
        .unwrap_or(text);

    Err(SdkError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = SubscriptionClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/health"), "http://localhost:8080/health");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = SubscriptionClient::new("http://127.0.0.1:1").unwrap();
        let err = client.get("anything").await.unwrap_err();
        assert!(matches!(err, SdkError::Transport(_)));
        assert!(!err.is_not_found());
    }
}
