// Subscription Domain Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};

/// Subscription ID (UUID v4)
pub type SubscriptionId = String;

/// Subscription Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub title: String,
    /// Minor currency units
    pub price: i64,
    pub user_id: String,

    // Month granularity, always the first day of the month
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    pub created_at: i64, // epoch ms
    pub updated_at: i64, // epoch ms
}

impl Subscription {
    /// Build a new entity from a validated create request.
    pub fn from_request(
        id: SubscriptionId,
        now_millis: i64,
        req: CreateSubscriptionRequest,
    ) -> Self {
        Self {
            id,
            title: req.title,
            price: req.price,
            user_id: req.user_id,
            start_date: req.start_date,
            end_date: req.end_date,
            created_at: now_millis,
            updated_at: now_millis,
        }
    }
}

/// Create request (id and timestamps are assigned by the use case)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub title: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl CreateSubscriptionRequest {
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.title, self.price, self.start_date, self.end_date)?;
        if self.user_id.trim().is_empty() {
            return Err(DomainError::InvalidSubscription(
                "user_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Update request; `updated_at` is stamped by the use case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub id: SubscriptionId,
    pub title: String,
    pub price: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub updated_at: i64,
}

impl UpdateSubscriptionRequest {
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.title, self.price, self.start_date, self.end_date)
    }
}

fn validate_fields(
    title: &str,
    price: i64,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidSubscription(
            "title must not be empty".to_string(),
        ));
    }
    if price < 0 {
        return Err(DomainError::InvalidSubscription(format!(
            "price must not be negative (got {})",
            price
        )));
    }
    if let Some(end) = end_date {
        if end < start_date {
            return Err(DomainError::InvalidSubscription(format!(
                "end date {} is before start date {}",
                end, start_date
            )));
        }
    }
    Ok(())
}

/// Read-side query descriptor. Every predicate is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub title: Option<String>,
    pub user_id: Option<String>,
    pub price: Option<i64>,
    /// Matches rows with `start_date >= from`
    pub start_date: Option<NaiveDate>,
    /// Matches rows with `end_date <= to` (open-ended rows never match)
    pub end_date: Option<NaiveDate>,

    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListFilter {
    /// Same predicates without pagination (used for aggregates)
    pub fn without_pagination(&self) -> Self {
        Self {
            limit: None,
            offset: None,
            ..self.clone()
        }
    }
}
