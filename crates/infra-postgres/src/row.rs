// Row mapping for the subscriptions table

use chrono::NaiveDate;
use subscription_core::domain::Subscription;

/// PostgreSQL row representation (`service_name` is the domain title)
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SubscriptionRow {
    id: String,
    service_name: String,
    price: i64,
    user_id: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    created_at: i64,
    updated_at: i64,
}

impl SubscriptionRow {
    pub(crate) fn into_subscription(self) -> Subscription {
        Subscription {
            id: self.id,
            title: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
