//! PostgreSQL adapter tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p subscription-integration-tests -- --ignored

mod common;

use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use subscription_core::application::{SubscriptionService, TxRetryPolicy};
use subscription_core::domain::{
    IsolationLevel, ListFilter, Subscription, UpdateSubscriptionRequest,
};
use subscription_core::port::id_provider::UuidProvider;
use subscription_core::port::time_provider::SystemTimeProvider;
use subscription_core::port::{StorageError, SubscriptionRepository, TransactionController};
use subscription_infra_postgres::{
    create_pool, run_migrations, PgSubscriptionRepository, PgTransactionController, PoolConfig,
};
use uuid::Uuid;

use common::month;

async fn setup() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&url, &PoolConfig::default()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

fn subscription(user_id: &str, title: &str, price: i64, created_at: i64) -> Subscription {
    Subscription {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        price,
        user_id: user_id.to_string(),
        start_date: month(2025, 1),
        end_date: Some(month(2025, 12)),
        created_at,
        updated_at: created_at,
    }
}

fn update_of(sub: &Subscription, price: i64) -> UpdateSubscriptionRequest {
    UpdateSubscriptionRequest {
        id: sub.id.clone(),
        title: sub.title.clone(),
        price,
        start_date: sub.start_date,
        end_date: sub.end_date,
        updated_at: Utc::now().timestamp_millis(),
    }
}

fn by_user(user_id: &str) -> ListFilter {
    ListFilter {
        user_id: Some(user_id.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_get_delete() {
    let repo = PgSubscriptionRepository::new(setup().await);
    let user = Uuid::new_v4().to_string();
    let sub = subscription(&user, "Premium", 1000, 1);

    repo.create(&sub).await.unwrap();
    assert_eq!(repo.get(&sub.id).await.unwrap(), sub);

    repo.delete(&sub.id).await.unwrap();
    assert_eq!(repo.get(&sub.id).await.unwrap_err(), StorageError::NotFound);
    assert_eq!(repo.delete(&sub.id).await.unwrap_err(), StorageError::NotFound);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_key_is_already_exists() {
    let repo = PgSubscriptionRepository::new(setup().await);
    let user = Uuid::new_v4().to_string();

    repo.create(&subscription(&user, "Premium", 1000, 1)).await.unwrap();
    let err = repo
        .create(&subscription(&user, "Premium", 2000, 2))
        .await
        .unwrap_err();
    assert_eq!(err, StorageError::AlreadyExists);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_missing_row_is_not_found() {
    let repo = PgSubscriptionRepository::new(setup().await);
    let ghost = subscription("nobody", "Ghost", 1, 1);

    assert_eq!(
        repo.update(&update_of(&ghost, 2)).await.unwrap_err(),
        StorageError::NotFound
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_order_filters_and_sum() {
    let repo = PgSubscriptionRepository::new(setup().await);
    let user = Uuid::new_v4().to_string();

    let late = subscription(&user, "Music", 1500, 200);
    let early = subscription(&user, "Premium", 1000, 100);
    let mut open_ended = subscription(&user, "Cloud", 700, 300);
    open_ended.end_date = None;
    for sub in [&late, &early, &open_ended] {
        repo.create(sub).await.unwrap();
    }

    let all = repo.list(&by_user(&user)).await.unwrap();
    let ids: Vec<_> = all.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![early.id.as_str(), late.id.as_str(), open_ended.id.as_str()]);

    let page = ListFilter {
        limit: Some(1),
        offset: Some(1),
        ..by_user(&user)
    };
    assert_eq!(repo.list(&page).await.unwrap()[0].id, late.id);

    assert_eq!(repo.sum(&by_user(&user)).await.unwrap(), 3200);

    let bounded = ListFilter {
        end_date: Some(month(2025, 12)),
        ..by_user(&user)
    };
    assert_eq!(repo.sum(&bounded).await.unwrap(), 2500);

    let nobody = by_user(&Uuid::new_v4().to_string());
    assert!(repo.list(&nobody).await.unwrap().is_empty());
    assert_eq!(repo.sum(&nobody).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_rollback_discards_and_commit_persists() {
    let pool = setup().await;
    let repo = PgSubscriptionRepository::new(pool.clone());
    let controller = PgTransactionController::new(pool);
    let sub = subscription(&Uuid::new_v4().to_string(), "Premium", 1000, 1);
    repo.create(&sub).await.unwrap();

    let mut tx = controller.begin_tx(IsolationLevel::RepeatableRead).await.unwrap();
    tx.update(&update_of(&sub, 1)).await.unwrap();
    tx.rollback().await.unwrap();
    assert_eq!(repo.get(&sub.id).await.unwrap().price, 1000);

    let mut tx = controller.begin_tx(IsolationLevel::Serializable).await.unwrap();
    tx.update(&update_of(&sub, 2)).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(repo.get(&sub.id).await.unwrap().price, 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_update_is_transaction_failure() {
    let pool = setup().await;
    let repo = PgSubscriptionRepository::new(pool.clone());
    let controller = PgTransactionController::new(pool);
    let sub = subscription(&Uuid::new_v4().to_string(), "Premium", 1000, 1);
    repo.create(&sub).await.unwrap();

    let mut first = controller.begin_tx(IsolationLevel::RepeatableRead).await.unwrap();
    let mut second = controller.begin_tx(IsolationLevel::RepeatableRead).await.unwrap();

    first.update(&update_of(&sub, 1100)).await.unwrap();

    // Blocks on the row lock held by `first`
    let req = update_of(&sub, 1200);
    let blocked = tokio::spawn(async move {
        let result = second.update(&req).await;
        let _ = second.rollback().await;
        result
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    first.commit().await.unwrap();

    let err = blocked.await.unwrap().unwrap_err();
    assert!(matches!(err, StorageError::TransactionFailure(_)));
    assert_eq!(repo.get(&sub.id).await.unwrap().price, 1100);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_service_updates_converge_under_contention() {
    let pool = setup().await;
    let service = Arc::new(SubscriptionService::new(
        Arc::new(PgSubscriptionRepository::new(pool.clone())),
        Arc::new(PgTransactionController::new(pool)),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        TxRetryPolicy::default(),
    ));

    let user = Uuid::new_v4().to_string();
    let sub = service
        .create(common::create_request("Premium", 1000, &user))
        .await
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let service = service.clone();
            let req = common::update_request(&sub.id, "Premium", 2000 + i);
            tokio::spawn(async move { service.update(req).await })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => succeeded += 1,
            Err(e) => assert!(e.is_transaction_failure(), "unexpected error: {}", e),
        }
    }

    assert!(succeeded >= 1);
    let price = service.read(&sub.id).await.unwrap().price;
    assert!((2000..2004).contains(&price));
}
