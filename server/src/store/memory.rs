use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TodoStore};
use crate::model::{NewTodo, TodoId, TodoItem, TodoPatch};

/// Process-local store used in degraded mode and in tests.
///
/// Ids come from a counter that only moves forward, so keying the map by id
/// keeps items in insertion order and a deleted id is never handed out again.
#[derive(Debug)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<TodoId, TodoItem>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn assign_id(&self) -> StoreResult<TodoId> {
        TodoId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
            .ok_or_else(|| StoreError::Unavailable("todo id space exhausted".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<TodoItem>> {
        let items = self.items.read().await;
        Ok(items.values().cloned().collect())
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<TodoItem> {
        let item = TodoItem {
            id: self.assign_id()?,
            body: todo.body,
            completed: false,
        };
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: TodoId) -> StoreResult<TodoItem> {
        let items = self.items.read().await;
        items.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn update_fields(&self, id: TodoId, patch: TodoPatch) -> StoreResult<()> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(completed) = patch.completed {
            item.completed = completed;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: TodoId) -> StoreResult<()> {
        let mut items = self.items.write().await;
        items.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(body: &str) -> NewTodo {
        NewTodo {
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn list_all_on_empty_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_defaults_completed() {
        let store = MemoryStore::new();
        let first = store.insert(new_todo("a")).await.unwrap();
        let second = store.insert(new_todo("b")).await.unwrap();
        assert_eq!(first.id.get(), 1);
        assert_eq!(second.id.get(), 2);
        assert!(!first.completed);
        assert!(!second.completed);
    }

    #[tokio::test]
    async fn list_all_keeps_insertion_order() {
        let store = MemoryStore::new();
        for body in ["one", "two", "three"] {
            store.insert(new_todo(body)).await.unwrap();
        }
        let bodies: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.body)
            .collect();
        assert_eq!(bodies, ["one", "two", "three"]);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.insert(new_todo("a")).await.unwrap();
        store.delete_by_id(first.id).await.unwrap();
        let second = store.insert(new_todo("b")).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn update_fields_on_missing_id_does_not_create() {
        let store = MemoryStore::new();
        let id = TodoId::new(9).unwrap();
        let err = store
            .update_fields(id, TodoPatch::completed(true))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(id));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_patch_leaves_item_unchanged() {
        let store = MemoryStore::new();
        let item = store.insert(new_todo("a")).await.unwrap();
        store
            .update_fields(item.id, TodoPatch::default())
            .await
            .unwrap();
        assert_eq!(store.find_by_id(item.id).await.unwrap(), item);
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let store = MemoryStore::new();
        let id = TodoId::new(1).unwrap();
        assert_eq!(
            store.delete_by_id(id).await.unwrap_err(),
            StoreError::NotFound(id)
        );
    }
}
