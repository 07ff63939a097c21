// CRUD adapter over a backing store.
// Owns validation, timestamp assignment, and patch application; the backend
// owns ids and wire mapping.

use chrono::Utc;
use tracing::warn;

use crate::error::{Result, TidoError};
use crate::todo::{ListOutcome, Priority, Status, TodoDraft, TodoItem, TodoPatch};

use super::TodoStore;

/// Uniform CRUD contract over whichever backing store is configured.
pub struct StoreAdapter<S: TodoStore> {
    store: S,
}

impl<S: TodoStore> StoreAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch all todos. Records the backend skipped are logged and counted
    /// in the outcome; one bad row never hides the rest.
    pub async fn list(&self) -> Result<ListOutcome> {
        let outcome = self.store.fetch_all().await?;
        if outcome.skipped > 0 {
            warn!(skipped = outcome.skipped, "skipped unmappable records during list");
        }
        Ok(outcome)
    }

    /// Create a new todo. Validation happens before any write; the store
    /// assigns the id, and `created_at == updated_at` on the returned item.
    pub async fn create(&self, task: &str, priority: Option<Priority>) -> Result<TodoItem> {
        let task = validate_task(task)?;
        let now = Utc::now();
        let draft = TodoDraft {
            task,
            status: Status::Pending,
            priority: priority.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert(&draft).await
    }

    /// Apply a partial update and refresh `updated_at`.
    /// `NotFound` if the id is absent at write time.
    pub async fn update(&self, id: &str, patch: &TodoPatch) -> Result<TodoItem> {
        if patch.is_empty() {
            return Err(TidoError::Validation("nothing to update".into()));
        }
        let task = patch.task.as_deref().map(validate_task).transpose()?;

        let mut item = self.store.fetch(id).await?;
        if let Some(task) = task {
            item.task = task;
        }
        if let Some(priority) = patch.priority {
            item.priority = priority;
        }
        if let Some(completed) = patch.completed {
            item.status = Status::from_completed(completed);
        }
        item.updated_at = Utc::now();

        self.store.replace(&item).await
    }

    /// Delete a todo. Deleting a missing id is `NotFound`, not a no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.remove(id).await
    }
}

fn validate_task(task: &str) -> Result<String> {
    let trimmed = task.trim();
    if trimmed.is_empty() {
        return Err(TidoError::Validation("task description is empty".into()));
    }
    Ok(trimmed.to_string())
}
