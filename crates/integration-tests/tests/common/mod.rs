//! Shared fixtures over the in-memory store from `subscription_core::testing`
#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use subscription_core::application::{SubscriptionService, TxRetryPolicy};
use subscription_core::domain::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use subscription_core::testing::{memory_service, MemoryStore};

/// Service over a fresh store; retries back off for 1ms
pub fn service() -> (Arc<SubscriptionService>, Arc<MemoryStore>) {
    memory_service(TxRetryPolicy::new(Duration::from_millis(1), 3))
}

pub fn month(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

pub fn create_request(title: &str, price: i64, user_id: &str) -> CreateSubscriptionRequest {
    CreateSubscriptionRequest {
        title: title.to_string(),
        price,
        user_id: user_id.to_string(),
        start_date: month(2025, 1),
        end_date: Some(month(2025, 12)),
    }
}

pub fn update_request(id: &str, title: &str, price: i64) -> UpdateSubscriptionRequest {
    UpdateSubscriptionRequest {
        id: id.to_string(),
        title: title.to_string(),
        price,
        start_date: month(2025, 1),
        end_date: None,
        updated_at: 0,
    }
}
