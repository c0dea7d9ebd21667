//! Subscription SDK - Rust Client Library
//!
//! Typed client for the subscription service REST API.
//!
//! # Example
//!
//! ```no_run
//! use subscription_sdk::{NewSubscription, SubscriptionClient, SubscriptionQuery};
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SubscriptionClient::new("http://127.0.0.1:8080")?;
//!
//!     let user_id = Uuid::new_v4();
//!     let created = client
//!         .create(&NewSubscription {
//!             service_name: "Yandex Plus".to_string(),
//!             price: 400,
//!             user_id,
//!             start_date: "07-2025".to_string(),
//!             end_date: None,
//!         })
//!         .await?;
//!     println!("Created: {}", created.id);
//!
//!     let total = client
//!         .sum(&SubscriptionQuery {
//!             user_id: Some(user_id),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Total: {}", total);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::SubscriptionClient;
pub use error::{Result, SdkError};
pub use types::{NewSubscription, Subscription, SubscriptionQuery, SubscriptionUpdate};
