// In-memory adapters for tests (enabled by the `test-util` feature)

use crate::application::{SubscriptionService, TxRetryPolicy};
use crate::domain::{IsolationLevel, ListFilter, Subscription, UpdateSubscriptionRequest};
use crate::port::id_provider::UuidProvider;
use crate::port::time_provider::SystemTimeProvider;
use crate::port::{
    StorageError, StorageResult, SubscriptionRepository, SubscriptionTransaction, Transaction,
    TransactionController,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Repository and transaction backend over a `HashMap`.
///
/// Enforces the `(user_id, title, start_date)` uniqueness the real schema has,
/// can fail the next `n` transactional updates with a serialization conflict,
/// and counts transaction activity.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, Subscription>>,
    pending_conflicts: AtomicU32,
    read_delay_ms: AtomicU64,
    pub tx_updates: AtomicU32,
    pub commits: AtomicU32,
    pub rollbacks: AtomicU32,
}

impl MemoryStore {
    /// Fail the next `n` transactional updates with `TransactionFailure`
    pub fn inject_conflicts(&self, n: u32) {
        self.pending_conflicts.store(n, Ordering::SeqCst);
    }

    /// Delay every `list` and `sum` call
    pub fn set_read_delay(&self, delay: Duration) {
        self.read_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn count(&self, counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Insert a row as-is, bypassing uniqueness checks
    pub fn insert(&self, subscription: Subscription) {
        self.rows().insert(subscription.id.clone(), subscription);
    }

    fn rows(&self) -> MutexGuard<'_, HashMap<String, Subscription>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn duplicate_of(rows: &HashMap<String, Subscription>, candidate: &Subscription) -> bool {
        rows.values().any(|s| {
            s.id != candidate.id
                && s.user_id == candidate.user_id
                && s.title == candidate.title
                && s.start_date == candidate.start_date
        })
    }

    fn updated_row(
        rows: &HashMap<String, Subscription>,
        req: &UpdateSubscriptionRequest,
    ) -> StorageResult<Subscription> {
        let mut row = rows.get(&req.id).cloned().ok_or(StorageError::NotFound)?;
        row.title = req.title.clone();
        row.price = req.price;
        row.start_date = req.start_date;
        row.end_date = req.end_date;
        row.updated_at = req.updated_at;

        if Self::duplicate_of(rows, &row) {
            return Err(StorageError::AlreadyExists);
        }
        Ok(row)
    }

    fn apply(&self, req: &UpdateSubscriptionRequest) -> StorageResult<()> {
        let mut rows = self.rows();
        let row = Self::updated_row(&rows, req)?;
        rows.insert(row.id.clone(), row);
        Ok(())
    }

    async fn matching(&self, filter: &ListFilter) -> Vec<Subscription> {
        let delay = self.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let rows = self.rows();
        let mut subs: Vec<Subscription> = rows
            .values()
            .filter(|s| filter.title.as_ref().map_or(true, |t| &s.title == t))
            .filter(|s| filter.user_id.as_ref().map_or(true, |u| &s.user_id == u))
            .filter(|s| filter.price.map_or(true, |p| s.price == p))
            .filter(|s| filter.start_date.map_or(true, |from| s.start_date >= from))
            .filter(|s| {
                filter
                    .end_date
                    .map_or(true, |to| s.end_date.is_some_and(|end| end <= to))
            })
            .cloned()
            .collect();
        subs.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        subs
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn create(&self, subscription: &Subscription) -> StorageResult<()> {
        let mut rows = self.rows();
        if rows.contains_key(&subscription.id) || Self::duplicate_of(&rows, subscription) {
            return Err(StorageError::AlreadyExists);
        }
        rows.insert(subscription.id.clone(), subscription.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Subscription> {
        self.rows().get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn update(&self, req: &UpdateSubscriptionRequest) -> StorageResult<()> {
        self.apply(req)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.rows()
            .remove(id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn list(&self, filter: &ListFilter) -> StorageResult<Vec<Subscription>> {
        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(self
            .matching(filter)
            .await
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn sum(&self, filter: &ListFilter) -> StorageResult<i64> {
        Ok(self.matching(filter).await.iter().map(|s| s.price).sum())
    }
}

struct MemoryTx {
    store: Arc<MemoryStore>,
    staged: Option<UpdateSubscriptionRequest>,
}

#[async_trait]
impl Transaction for MemoryTx {
    async fn commit(self: Box<Self>) -> StorageResult<()> {
        self.store.commits.fetch_add(1, Ordering::SeqCst);
        match &self.staged {
            Some(req) => self.store.apply(req),
            None => Ok(()),
        }
    }

    async fn rollback(self: Box<Self>) -> StorageResult<()> {
        self.store.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SubscriptionTransaction for MemoryTx {
    async fn update(&mut self, req: &UpdateSubscriptionRequest) -> StorageResult<()> {
        self.store.tx_updates.fetch_add(1, Ordering::SeqCst);

        let conflict = self
            .store
            .pending_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if conflict {
            return Err(StorageError::TransactionFailure(
                "could not serialize access due to concurrent update".to_string(),
            ));
        }

        MemoryStore::updated_row(&self.store.rows(), req)?;
        self.staged = Some(req.clone());
        Ok(())
    }
}

/// Opens [`MemoryStore`] transactions; the isolation level is ignored
pub struct MemoryTxController(pub Arc<MemoryStore>);

#[async_trait]
impl TransactionController for MemoryTxController {
    async fn begin_tx(
        &self,
        _isolation: IsolationLevel,
    ) -> StorageResult<Box<dyn SubscriptionTransaction>> {
        Ok(Box::new(MemoryTx {
            store: self.0.clone(),
            staged: None,
        }))
    }
}

/// Service wired to a fresh [`MemoryStore`]
pub fn memory_service(policy: TxRetryPolicy) -> (Arc<SubscriptionService>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = SubscriptionService::new(
        store.clone(),
        Arc::new(MemoryTxController(store.clone())),
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        policy,
    );
    (Arc::new(service), store)
}
