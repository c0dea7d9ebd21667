//! Simple SDK Example
//!
//! Demonstrates basic usage of the subscription SDK.
//!
//! # Usage
//!
//! 1. Start the service:
//!    ```bash
//!    cargo run --package subscription-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package subscription-sdk --example simple
//!    ```

use subscription_sdk::{NewSubscription, SubscriptionClient, SubscriptionQuery, SubscriptionUpdate};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("SUBSCRIPTION_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let client = SubscriptionClient::new(base_url)?;
    let user_id = Uuid::new_v4();

    // 1. Create
    let created = client
        .create(&NewSubscription {
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id,
            start_date: "07-2025".to_string(),
            end_date: None,
        })
        .await?;
    println!("Created {} ({})", created.id, created.service_name);

    // 2. Update
    client
        .update(
            &created.id,
            &SubscriptionUpdate {
                service_name: "Yandex Plus".to_string(),
                price: 450,
                start_date: "07-2025".to_string(),
                end_date: Some("12-2025".to_string()),
            },
        )
        .await?;
    let updated = client.get(&created.id).await?;
    println!("Price is now {}", updated.price);

    // 3. Aggregate
    let query = SubscriptionQuery {
        user_id: Some(user_id),
        ..Default::default()
    };
    println!("Listed: {}", client.list(&query).await?.len());
    println!("Total cost: {}", client.sum(&query).await?);

    // 4. Delete
    client.delete(&created.id).await?;
    match client.get(&created.id).await {
        Err(e) if e.is_not_found() => println!("Deleted"),
        other => println!("Unexpected: {:?}", other.map(|s| s.id)),
    }

    Ok(())
}
