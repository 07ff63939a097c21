// Read cache for the list operation.
// Holds a time-boxed snapshot of the last list result and invalidates it
// after every successful mutation, so reads within the TTL window cost
// nothing and writes are always visible on the next list.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::store::{StoreAdapter, TodoStore};
use crate::todo::{ListOutcome, Priority, TodoItem, TodoPatch};

/// Default TTL for the cached list snapshot: 10 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct Snapshot {
    outcome: ListOutcome,
    fetched_at: DateTime<Utc>,
}

/// Two-state cache over the list result: a snapshot is either fresh
/// (age < TTL, no invalidation since the fetch) or absent.
#[derive(Debug)]
pub struct ReadCache {
    snapshot: Option<Snapshot>,
    ttl: Duration,
}

impl ReadCache {
    pub fn new(ttl: Duration) -> Self {
        Self { snapshot: None, ttl }
    }

    /// Return the snapshot if it is still fresh.
    pub fn get(&self) -> Option<&ListOutcome> {
        let snapshot = self.snapshot.as_ref()?;
        if self.is_fresh(snapshot.fetched_at) {
            Some(&snapshot.outcome)
        } else {
            None
        }
    }

    /// Replace the snapshot with a freshly fetched result.
    pub fn put(&mut self, outcome: ListOutcome) {
        self.snapshot = Some(Snapshot {
            outcome,
            fetched_at: Utc::now(),
        });
    }

    /// Force the next `get` to miss, regardless of age.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>) -> bool {
        let age = Utc::now()
            .signed_duration_since(fetched_at)
            .to_std()
            .unwrap_or(Duration::MAX);
        age < self.ttl
    }
}

/// Store adapter with a read-through cache on `list`.
///
/// This is the surface the UI shell talks to: the four CRUD operations plus
/// the manual `invalidate` hook. Mutations delegate to the adapter and drop
/// the snapshot only when the write succeeded; a failed list fetch leaves
/// the previous snapshot untouched so a retry can still succeed.
pub struct CachedStore<S: TodoStore> {
    adapter: StoreAdapter<S>,
    cache: ReadCache,
}

impl<S: TodoStore> CachedStore<S> {
    pub fn new(adapter: StoreAdapter<S>, ttl: Duration) -> Self {
        Self {
            adapter,
            cache: ReadCache::new(ttl),
        }
    }

    pub async fn list(&mut self) -> Result<ListOutcome> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached.clone());
        }
        let outcome = self.adapter.list().await?;
        self.cache.put(outcome.clone());
        Ok(outcome)
    }

    pub async fn create(&mut self, task: &str, priority: Option<Priority>) -> Result<TodoItem> {
        let item = self.adapter.create(task, priority).await?;
        self.cache.invalidate();
        Ok(item)
    }

    pub async fn update(&mut self, id: &str, patch: &TodoPatch) -> Result<TodoItem> {
        let item = self.adapter.update(id, patch).await?;
        self.cache.invalidate();
        Ok(item)
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.adapter.delete(id).await?;
        self.cache.invalidate();
        Ok(())
    }

    /// Manual refresh hook: the next `list` goes to the backing store.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TidoError;
    use crate::store::MemoryStore;

    const LONG_TTL: Duration = Duration::from_secs(600);

    fn cached(ttl: Duration) -> (CachedStore<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (CachedStore::new(StoreAdapter::new(store.clone()), ttl), store)
    }

    #[tokio::test]
    async fn test_repeated_list_within_ttl_fetches_once() {
        let (mut cached, store) = cached(LONG_TTL);
        cached.create("cached task", None).await.unwrap();

        let first = cached.list().await.unwrap();
        let second = cached.list().await.unwrap();
        let third = cached.list().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(store.fetch_all_calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_snapshot_refetches() {
        // Zero TTL: every snapshot is stale by the time it is read back.
        let (mut cached, store) = cached(Duration::ZERO);
        cached.list().await.unwrap();
        cached.list().await.unwrap();
        assert_eq!(store.fetch_all_calls(), 2);
    }

    #[tokio::test]
    async fn test_create_invalidates_within_ttl() {
        let (mut cached, _) = cached(LONG_TTL);
        assert!(cached.list().await.unwrap().items.is_empty());

        let created = cached.create("fresh", Some(Priority::High)).await.unwrap();

        let items = cached.list().await.unwrap().items;
        assert_eq!(items, vec![created]);
    }

    #[tokio::test]
    async fn test_update_and_delete_invalidate_within_ttl() {
        let (mut cached, _) = cached(LONG_TTL);
        let item = cached.create("mutate me", None).await.unwrap();
        cached.list().await.unwrap();

        cached
            .update(&item.id, &TodoPatch::default().completed(true))
            .await
            .unwrap();
        assert!(cached.list().await.unwrap().items[0].completed());

        cached.delete(&item.id).await.unwrap();
        assert!(cached.list().await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_snapshot() {
        let (mut cached, store) = cached(LONG_TTL);
        cached.create("keep me", None).await.unwrap();
        cached.list().await.unwrap();
        let calls_before = store.fetch_all_calls();

        let err = cached
            .update("missing", &TodoPatch::default().completed(true))
            .await
            .unwrap_err();
        assert!(matches!(err, TidoError::NotFound(_)));

        // Snapshot survived the failed write: no refetch on the next list.
        cached.list().await.unwrap();
        assert_eq!(store.fetch_all_calls(), calls_before);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_prior_state() {
        let (mut cached, store) = cached(Duration::ZERO);
        cached.create("survivor", None).await.unwrap();
        let good = cached.list().await.unwrap();

        store.set_unavailable(true);
        let err = cached.list().await.unwrap_err();
        assert!(matches!(err, TidoError::StoreUnavailable(_)));

        // Store recovers; the next list succeeds and sees the same data.
        store.set_unavailable(false);
        assert_eq!(cached.list().await.unwrap(), good);
    }

    #[tokio::test]
    async fn test_manual_invalidate_forces_refetch() {
        let (mut cached, store) = cached(LONG_TTL);
        cached.list().await.unwrap();
        cached.invalidate();
        cached.list().await.unwrap();
        assert_eq!(store.fetch_all_calls(), 2);
    }

    #[test]
    fn test_read_cache_state_transitions() {
        let mut cache = ReadCache::new(LONG_TTL);
        assert!(cache.get().is_none());

        cache.put(ListOutcome::default());
        assert!(cache.get().is_some());

        cache.invalidate();
        assert!(cache.get().is_none());
    }
}
