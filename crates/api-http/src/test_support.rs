// Router test fixtures over the in-memory store

use std::sync::Arc;
use subscription_core::application::{SubscriptionService, TxRetryPolicy};
use subscription_core::domain::Subscription;
use subscription_core::testing::{self, MemoryStore};

pub(crate) fn memory_service() -> (Arc<SubscriptionService>, Arc<MemoryStore>) {
    testing::memory_service(TxRetryPolicy::default())
}

/// Insert a row directly and return its id
pub(crate) fn seed(store: &MemoryStore, title: &str, price: i64, user_id: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    store.insert(Subscription {
        id: id.clone(),
        title: title.to_string(),
        price,
        user_id: user_id.to_string(),
        start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end_date: None,
        created_at: 0,
        updated_at: 0,
    });
    id
}
