//! Todo lifecycle: create, list, find, toggle, delete.
//!
//! # Design
//! `TodoService` owns no state besides the injected store handle and the
//! per-round-trip deadline. Nothing is cached between calls, so the store is
//! the single source of truth.
//!
//! Toggle is a read-modify-write without a compare-and-swap guard. Two
//! concurrent toggles of the same id can both read the same `completed` value
//! and write the same negation, so one flip is lost. Different ids never
//! interfere.

use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, instrument, warn};

use crate::error::ServiceError;
use crate::model::{NewTodo, TodoId, TodoItem, TodoPatch};
use crate::store::{StoreResult, TodoStore};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    store_timeout: Duration,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self::with_timeout(store, DEFAULT_STORE_TIMEOUT)
    }

    /// Every store round trip fails with `StoreUnavailable` if it takes
    /// longer than `store_timeout`.
    pub fn with_timeout(store: Arc<dyn TodoStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// Rejects an empty or whitespace-only body before touching the store.
    /// The body is persisted exactly as given.
    #[instrument(skip(self))]
    pub async fn create(&self, body: String) -> Result<TodoItem, ServiceError> {
        if body.trim().is_empty() {
            return Err(ServiceError::Validation("todo body cannot be empty".to_string()));
        }
        let item = self.round_trip("insert", self.store.insert(NewTodo { body })).await?;
        debug!(id = %item.id, "todo created");
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TodoItem>, ServiceError> {
        self.round_trip("list_all", self.store.list_all()).await
    }

    #[instrument(skip(self))]
    pub async fn find(&self, id: TodoId) -> Result<TodoItem, ServiceError> {
        self.round_trip("find_by_id", self.store.find_by_id(id)).await
    }

    /// Flips `completed` and returns the item as written.
    ///
    /// Two round trips: read, then a targeted field update. If the item is
    /// deleted in between, the update reports `NotFound`.
    #[instrument(skip(self))]
    pub async fn toggle(&self, id: TodoId) -> Result<TodoItem, ServiceError> {
        debug!(%id, "toggle requested");
        let mut item = self.round_trip("find_by_id", self.store.find_by_id(id)).await?;
        item.completed = !item.completed;
        self.round_trip(
            "update_fields",
            self.store.update_fields(id, TodoPatch::completed(item.completed)),
        )
        .await?;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: TodoId) -> Result<(), ServiceError> {
        self.round_trip("delete_by_id", self.store.delete_by_id(id)).await?;
        debug!(%id, "todo deleted");
        Ok(())
    }

    /// Runs one store call under the deadline. When the deadline fires the
    /// store future is dropped; whether a write already landed is up to the
    /// backend.
    async fn round_trip<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> Result<T, ServiceError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "store call timed out"
                );
                Err(ServiceError::StoreUnavailable(format!(
                    "{operation} timed out after {}ms",
                    self.store_timeout.as_millis()
                )))
            }
        }
    }
}
