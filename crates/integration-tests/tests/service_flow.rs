//! Use-case level flows over in-memory adapters
//!
//! Exercises SubscriptionService end to end without a database, including
//! serialization conflicts injected into the update transaction.

mod common;

use common::{create_request, month, service, update_request};
use std::collections::HashSet;
use subscription_core::domain::ListFilter;

const USER: &str = "3f2b8c1d-0a9e-4d7f-b6c5-2e1a0f9d8c7b";

#[tokio::test]
async fn test_subscription_lifecycle() {
    let (service, store) = service();

    // Create
    let created = service
        .create(create_request("Premium", 1000, USER))
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.title, "Premium");
    assert_eq!(created.price, 1000);
    assert_eq!(created.user_id, USER);

    // Read
    assert_eq!(service.read(&created.id).await.unwrap(), created);

    // Update
    service
        .update(update_request(&created.id, "Updated Premium", 1500))
        .await
        .unwrap();
    let updated = service.read(&created.id).await.unwrap();
    assert_eq!(updated.title, "Updated Premium");
    assert_eq!(updated.price, 1500);
    assert_eq!(updated.end_date, None);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);

    // Delete
    service.delete(&created.id).await.unwrap();
    assert!(service.read(&created.id).await.unwrap_err().is_not_found());
    assert!(service.delete(&created.id).await.unwrap_err().is_not_found());
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_update_survives_single_conflict() {
    let (service, store) = service();
    let sub = service
        .create(create_request("Premium", 1000, USER))
        .await
        .unwrap();

    store.inject_conflicts(1);
    service
        .update(update_request(&sub.id, "Premium", 1200))
        .await
        .unwrap();

    assert_eq!(store.count(&store.tx_updates), 2);
    assert_eq!(store.count(&store.rollbacks), 1);
    assert_eq!(store.count(&store.commits), 1);
    assert_eq!(service.read(&sub.id).await.unwrap().price, 1200);
}

#[tokio::test]
async fn test_update_gives_up_after_bounded_attempts() {
    let (service, store) = service();
    let sub = service
        .create(create_request("Premium", 1000, USER))
        .await
        .unwrap();

    store.inject_conflicts(100);
    let err = service
        .update(update_request(&sub.id, "Premium", 1200))
        .await
        .unwrap_err();

    assert!(err.is_transaction_failure());
    assert_eq!(
        store.count(&store.tx_updates),
        service.retry_policy().max_attempts()
    );
    assert_eq!(store.count(&store.commits), 0);
    // Nothing was applied
    assert_eq!(service.read(&sub.id).await.unwrap().price, 1000);
}

#[tokio::test]
async fn test_update_missing_is_not_found_once() {
    let (service, store) = service();

    let err = service
        .update(update_request("does-not-exist", "Premium", 1))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(store.count(&store.tx_updates), 1);
    assert_eq!(store.count(&store.rollbacks), 1);
}

#[tokio::test]
async fn test_update_into_existing_key_is_already_exists() {
    let (service, store) = service();
    service
        .create(create_request("Premium", 1000, USER))
        .await
        .unwrap();
    let music = service
        .create(create_request("Music", 300, USER))
        .await
        .unwrap();

    let err = service
        .update(update_request(&music.id, "Premium", 300))
        .await
        .unwrap_err();

    assert!(err.is_already_exists());
    assert_eq!(store.count(&store.tx_updates), 1);
}

#[tokio::test]
async fn test_duplicate_create_is_rejected() {
    let (service, store) = service();
    service
        .create(create_request("Premium", 1000, USER))
        .await
        .unwrap();

    let err = service
        .create(create_request("Premium", 2000, USER))
        .await
        .unwrap_err();

    assert!(err.is_already_exists());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let (service, store) = service();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create(create_request(&format!("Service {}", i), 100, USER))
                    .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let sub = handle.await.unwrap().unwrap();
        assert!(ids.insert(sub.id));
    }
    assert_eq!(store.len(), 32);
}

#[tokio::test]
async fn test_list_and_sum_over_filters() {
    let (service, _) = service();
    service
        .create(create_request("Premium", 1000, USER))
        .await
        .unwrap();
    service
        .create(create_request("Music", 1500, USER))
        .await
        .unwrap();
    let mut open_ended = create_request("Cloud", 700, "another-user");
    open_ended.end_date = None;
    service.create(open_ended).await.unwrap();

    let by_user = ListFilter {
        user_id: Some(USER.to_string()),
        ..Default::default()
    };
    assert_eq!(service.list(&by_user).await.unwrap().len(), 2);
    assert_eq!(service.sum(&by_user).await.unwrap(), 2500);

    // Open-ended rows never satisfy an end_date bound
    let ending = ListFilter {
        end_date: Some(month(2025, 12)),
        ..Default::default()
    };
    assert_eq!(service.sum(&ending).await.unwrap(), 2500);

    let nobody = ListFilter {
        user_id: Some("nobody".to_string()),
        ..Default::default()
    };
    assert!(service.list(&nobody).await.unwrap().is_empty());
    assert_eq!(service.sum(&nobody).await.unwrap(), 0);

    // Pagination applies to list only
    let first_page = ListFilter {
        limit: Some(1),
        ..by_user.clone()
    };
    assert_eq!(service.list(&first_page).await.unwrap().len(), 1);
    assert_eq!(service.sum(&first_page).await.unwrap(), 2500);
}
