//! SDK Request/Response Types
//!
//! Mirrors the JSON bodies of the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription as returned by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    /// `MM-YYYY`
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating a subscription (dates are `MM-YYYY`)
#[derive(Debug, Clone, Serialize)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Body for replacing a subscription's mutable fields
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionUpdate {
    pub service_name: String,
    pub price: i64,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Filter for list and sum; pagination only applies to list
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubscriptionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl SubscriptionQuery {
    pub(crate) fn without_pagination(&self) -> Self {
        Self {
            limit: None,
            offset: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregationResult {
    pub total_cost: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub errors: Option<String>,
}
