//! Persistence of todo documents.
//!
//! # Design
//! `TodoStore` is the seam between the service and the backing database. The
//! service holds it as `Arc<dyn TodoStore>`, so the backend is chosen once at
//! startup and tests can swap in `MemoryStore` or a wrapper around it.
//!
//! Errors are deliberately coarse: a store reports either that an id does not
//! exist or that it could not complete the round trip. Driver errors are
//! converted to `Unavailable` inside each implementation.

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Storage;
use crate::model::{NewTodo, TodoId, TodoItem, TodoPatch};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("todo {0} not found")]
    NotFound(TodoId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document-style persistence for todo items.
///
/// Every method is one round trip to the backend. Implementations must be
/// safe to share across concurrently running requests.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// All items in store-defined order. An empty store yields an empty vec.
    async fn list_all(&self) -> StoreResult<Vec<TodoItem>>;

    /// Persists `todo` atomically and returns the canonical stored form,
    /// including its newly assigned id.
    async fn insert(&self, todo: NewTodo) -> StoreResult<TodoItem>;

    async fn find_by_id(&self, id: TodoId) -> StoreResult<TodoItem>;

    /// Applies `patch` to the item with `id` only. Never creates an item.
    async fn update_fields(&self, id: TodoId, patch: TodoPatch) -> StoreResult<()>;

    async fn delete_by_id(&self, id: TodoId) -> StoreResult<()>;

    /// Checks that the backend is reachable. Called once at startup.
    async fn ping(&self) -> StoreResult<()>;

    /// Releases backend resources. Called once after the server stops.
    async fn close(&self) {}
}

/// Opens the store selected by configuration and checks that it answers.
/// Any error here means the server must not start.
pub async fn open(storage: &Storage) -> StoreResult<Arc<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = match storage {
        Storage::Memory => {
            warn!("using in-memory store; todos will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        Storage::Sqlite { url } => Arc::new(SqliteStore::connect(url).await?),
    };
    if let Err(error) = store.ping().await {
        store.close().await;
        return Err(error);
    }
    info!("store is reachable");
    Ok(store)
}
