//! Request/response bodies and query parameters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subscription_core::domain::{
    format_month, parse_month, CreateSubscriptionRequest, ListFilter, Subscription,
    UpdateSubscriptionRequest,
};
use uuid::Uuid;

use crate::error::ApiError;

/// Subscription as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    /// `MM-YYYY`
    pub start_date: String,
    pub end_date: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            service_name: s.title,
            price: s.price,
            user_id: s.user_id,
            start_date: format_month(s.start_date),
            end_date: s.end_date.map(format_month),
            created_at: DateTime::from_timestamp_millis(s.created_at),
            updated_at: DateTime::from_timestamp_millis(s.updated_at),
        }
    }
}

/// POST /subscriptions body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionBody {
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl CreateSubscriptionBody {
    pub fn into_request(self) -> Result<CreateSubscriptionRequest, ApiError> {
        Ok(CreateSubscriptionRequest {
            title: self.service_name,
            price: self.price,
            user_id: self.user_id.to_string(),
            start_date: parse_month(&self.start_date)?,
            end_date: parse_optional_month(self.end_date.as_deref())?,
        })
    }
}

/// PUT /subscriptions/{id} body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubscriptionBody {
    pub service_name: String,
    pub price: i64,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl UpdateSubscriptionBody {
    pub fn into_request(self, id: Uuid) -> Result<UpdateSubscriptionRequest, ApiError> {
        Ok(UpdateSubscriptionRequest {
            id: id.to_string(),
            title: self.service_name,
            price: self.price,
            start_date: parse_month(&self.start_date)?,
            end_date: parse_optional_month(self.end_date.as_deref())?,
            updated_at: 0,
        })
    }
}

/// GET /subscriptions query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub service_name: Option<String>,
    pub user_id: Option<Uuid>,
    pub price: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    pub fn into_filter(self) -> Result<ListFilter, ApiError> {
        for (name, value) in [("limit", self.limit), ("offset", self.offset)] {
            if value.is_some_and(|v| v < 0) {
                return Err(ApiError::BadRequest(format!("{} must not be negative", name)));
            }
        }

        let sum = SumParams {
            service_name: self.service_name,
            user_id: self.user_id,
            price: self.price,
            start_date: self.start_date,
            end_date: self.end_date,
        };

        Ok(ListFilter {
            limit: self.limit,
            offset: self.offset,
            ..sum.into_filter()?
        })
    }
}

/// GET /subscriptions/sum query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SumParams {
    pub service_name: Option<String>,
    pub user_id: Option<Uuid>,
    pub price: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SumParams {
    pub fn into_filter(self) -> Result<ListFilter, ApiError> {
        Ok(ListFilter {
            title: self.service_name,
            user_id: self.user_id.map(|id| id.to_string()),
            price: self.price,
            start_date: parse_optional_month(self.start_date.as_deref())?,
            end_date: parse_optional_month(self.end_date.as_deref())?,
            limit: None,
            offset: None,
        })
    }
}

/// GET /subscriptions/sum response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub total_cost: i64,
}

fn parse_optional_month(value: Option<&str>) -> Result<Option<chrono::NaiveDate>, ApiError> {
    value.map(parse_month).transpose().map_err(ApiError::from)
}
