// In-memory backing store.
// Zero-configuration default backend; also the substitutable fake for tests.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::error::{Result, TidoError};
use crate::todo::{ListOutcome, TodoDraft, TodoItem};

use super::TodoStore;

#[derive(Debug, Default)]
struct Inner {
    /// Insertion order, like worksheet rows.
    items: Vec<TodoItem>,
    fetch_all_calls: usize,
    unavailable: bool,
}

/// Backing store held entirely in process memory. Clones share state, so a
/// test can keep a handle to the store it handed to the adapter.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panic mid-mutation; nothing to recover.
        self.inner.lock().unwrap()
    }

    /// Number of `fetch_all` calls served so far.
    #[cfg(test)]
    pub fn fetch_all_calls(&self) -> usize {
        self.guard().fetch_all_calls
    }

    /// Make every operation fail with `StoreUnavailable` until cleared.
    #[cfg(test)]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.guard().unavailable = unavailable;
    }

    fn check_available(inner: &Inner) -> Result<()> {
        if inner.unavailable {
            Err(TidoError::StoreUnavailable(
                "memory store marked unavailable".into(),
            ))
        } else {
            Ok(())
        }
    }
}

impl TodoStore for MemoryStore {
    async fn fetch_all(&self) -> Result<ListOutcome> {
        let mut inner = self.guard();
        Self::check_available(&inner)?;
        inner.fetch_all_calls += 1;
        Ok(ListOutcome::new(inner.items.clone()))
    }

    async fn fetch(&self, id: &str) -> Result<TodoItem> {
        let inner = self.guard();
        Self::check_available(&inner)?;
        inner
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| TidoError::NotFound(id.to_string()))
    }

    async fn insert(&self, draft: &TodoDraft) -> Result<TodoItem> {
        let mut inner = self.guard();
        Self::check_available(&inner)?;
        let item = draft.clone().into_item(Uuid::new_v4().to_string());
        inner.items.push(item.clone());
        Ok(item)
    }

    async fn replace(&self, item: &TodoItem) -> Result<TodoItem> {
        let mut inner = self.guard();
        Self::check_available(&inner)?;
        match inner.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(item.clone())
            }
            None => Err(TidoError::NotFound(item.id.clone())),
        }
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut inner = self.guard();
        Self::check_available(&inner)?;
        let before = inner.items.len();
        inner.items.retain(|item| item.id != id);
        if inner.items.len() == before {
            Err(TidoError::NotFound(id.to_string()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::todo::{Priority, Status};

    fn draft(task: &str) -> TodoDraft {
        let now = Utc::now();
        TodoDraft {
            task: task.to_string(),
            status: Status::Pending,
            priority: Priority::Medium,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.insert(&draft("a")).await.unwrap();
        let b = store.insert(&draft("b")).await.unwrap();
        assert_ne!(a.id, b.id);

        let outcome = store.fetch_all().await.unwrap();
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.skipped, 0);
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_insertion_order() {
        let store = MemoryStore::new();
        for task in ["first", "second", "third"] {
            store.insert(&draft(task)).await.unwrap();
        }
        let tasks: Vec<_> = store
            .fetch_all()
            .await
            .unwrap()
            .items
            .into_iter()
            .map(|i| i.task)
            .collect();
        assert_eq!(tasks, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let store = MemoryStore::new();
        let mut item = store.insert(&draft("a")).await.unwrap();
        item.id = "missing".to_string();
        let err = store.replace(&item).await.unwrap_err();
        assert!(matches!(err, TidoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_twice_is_not_found() {
        let store = MemoryStore::new();
        let item = store.insert(&draft("a")).await.unwrap();
        store.remove(&item.id).await.unwrap();
        let err = store.remove(&item.id).await.unwrap_err();
        assert!(matches!(err, TidoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_operation() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = store.fetch_all().await.unwrap_err();
        assert!(matches!(err, TidoError::StoreUnavailable(_)));
        let err = store.insert(&draft("a")).await.unwrap_err();
        assert!(matches!(err, TidoError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.insert(&draft("shared")).await.unwrap();
        assert_eq!(handle.fetch_all().await.unwrap().items.len(), 1);
        assert_eq!(handle.fetch_all_calls(), 1);
    }
}
