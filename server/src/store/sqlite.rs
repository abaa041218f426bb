//! SQLite-backed store.
//!
//! One row per todo document:
//!
//! ```sql
//! CREATE TABLE todos (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     body TEXT NOT NULL,
//!     completed INTEGER NOT NULL DEFAULT 0
//! );
//! ```
//!
//! `AUTOINCREMENT` makes the database the id authority and guarantees a
//! deleted id is never handed out again. Each statement commits atomically,
//! so a write whose caller gave up waiting either landed completely or not at
//! all; callers cannot tell which without reading back.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};

use super::{StoreError, StoreResult, TodoStore};
use crate::model::{NewTodo, TodoId, TodoItem, TodoPatch};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    body TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0
)";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

impl SqliteStore {
    /// Connects to `url` (e.g. `sqlite://todos.db`), creating the file and
    /// the table if they do not exist yet.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(unavailable)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(unavailable)?;
        Self::with_pool(pool).await
    }

    /// Private in-memory database. The pool is pinned to a single connection
    /// that never expires, since every new SQLite memory connection would
    /// otherwise see its own empty database.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(unavailable)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(unavailable)?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(unavailable)?;
        Ok(Self { pool })
    }
}

/// Ids above `i64::MAX` cannot exist in SQLite, so they are simply absent.
fn sql_id(id: TodoId) -> StoreResult<i64> {
    i64::try_from(id.get()).map_err(|_| StoreError::NotFound(id))
}

fn row_to_item(row: &SqliteRow) -> StoreResult<TodoItem> {
    let raw: i64 = row.try_get("id").map_err(unavailable)?;
    let id = u64::try_from(raw)
        .ok()
        .and_then(TodoId::new)
        .ok_or_else(|| StoreError::Unavailable(format!("stored row has invalid id {raw}")))?;
    Ok(TodoItem {
        id,
        body: row.try_get("body").map_err(unavailable)?,
        completed: row.try_get("completed").map_err(unavailable)?,
    })
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn list_all(&self) -> StoreResult<Vec<TodoItem>> {
        let rows = sqlx::query("SELECT id, body, completed FROM todos ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        rows.iter().map(row_to_item).collect()
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<TodoItem> {
        let result = sqlx::query("INSERT INTO todos (body, completed) VALUES (?, ?)")
            .bind(&todo.body)
            .bind(false)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        let raw = result.last_insert_rowid();
        let id = u64::try_from(raw)
            .ok()
            .and_then(TodoId::new)
            .ok_or_else(|| StoreError::Unavailable(format!("database assigned invalid id {raw}")))?;

        Ok(TodoItem {
            id,
            body: todo.body,
            completed: false,
        })
    }

    async fn find_by_id(&self, id: TodoId) -> StoreResult<TodoItem> {
        let row = sqlx::query("SELECT id, body, completed FROM todos WHERE id = ?")
            .bind(sql_id(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        match row {
            Some(row) => row_to_item(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn update_fields(&self, id: TodoId, patch: TodoPatch) -> StoreResult<()> {
        // SQLite counts rows matched by the WHERE clause, even when the new
        // value equals the old one, so zero rows means the id is absent.
        let result = sqlx::query("UPDATE todos SET completed = COALESCE(?, completed) WHERE id = ?")
            .bind(patch.completed)
            .bind(sql_id(id)?)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: TodoId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(sql_id(id)?)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(unavailable)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
