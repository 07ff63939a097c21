// Store module.
// Capability interface over the backing stores plus the CRUD adapter.

pub mod adapter;
pub mod firestore;
mod http;
pub mod memory;
pub mod sheets;

pub use adapter::StoreAdapter;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use sheets::SheetsStore;

use crate::error::Result;
use crate::todo::{ListOutcome, TodoDraft, TodoItem};

/// Capability interface implemented by every backing store.
///
/// Each backend owns the mapping between its native record shape and
/// `TodoItem`; nothing outside a backend branches on the store type.
/// Futures are awaited one interaction at a time, so implementations take
/// `&self` and need no internal coordination beyond what their client
/// library requires.
#[allow(async_fn_in_trait)]
pub trait TodoStore {
    /// Fetch every record, skipping (and counting) ones that fail to map.
    async fn fetch_all(&self) -> Result<ListOutcome>;

    /// Fetch a single record by id. `NotFound` if absent.
    async fn fetch(&self, id: &str) -> Result<TodoItem>;

    /// Write a new record. The store assigns the id.
    async fn insert(&self, draft: &TodoDraft) -> Result<TodoItem>;

    /// Overwrite the record with `item.id`. `NotFound` if absent at write time.
    async fn replace(&self, item: &TodoItem) -> Result<TodoItem>;

    /// Remove the record. `NotFound` if absent.
    async fn remove(&self, id: &str) -> Result<()>;
}

/// The configured backing store, chosen once at startup.
#[derive(Debug)]
pub enum AnyStore {
    Sheets(SheetsStore),
    Firestore(FirestoreStore),
    Memory(MemoryStore),
}

impl TodoStore for AnyStore {
    async fn fetch_all(&self) -> Result<ListOutcome> {
        match self {
            AnyStore::Sheets(s) => s.fetch_all().await,
            AnyStore::Firestore(s) => s.fetch_all().await,
            AnyStore::Memory(s) => s.fetch_all().await,
        }
    }

    async fn fetch(&self, id: &str) -> Result<TodoItem> {
        match self {
            AnyStore::Sheets(s) => s.fetch(id).await,
            AnyStore::Firestore(s) => s.fetch(id).await,
            AnyStore::Memory(s) => s.fetch(id).await,
        }
    }

    async fn insert(&self, draft: &TodoDraft) -> Result<TodoItem> {
        match self {
            AnyStore::Sheets(s) => s.insert(draft).await,
            AnyStore::Firestore(s) => s.insert(draft).await,
            AnyStore::Memory(s) => s.insert(draft).await,
        }
    }

    async fn replace(&self, item: &TodoItem) -> Result<TodoItem> {
        match self {
            AnyStore::Sheets(s) => s.replace(item).await,
            AnyStore::Firestore(s) => s.replace(item).await,
            AnyStore::Memory(s) => s.replace(item).await,
        }
    }

    async fn remove(&self, id: &str) -> Result<()> {
        match self {
            AnyStore::Sheets(s) => s.remove(id).await,
            AnyStore::Firestore(s) => s.remove(id).await,
            AnyStore::Memory(s) => s.remove(id).await,
        }
    }
}
