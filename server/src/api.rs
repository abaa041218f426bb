//! HTTP endpoints for the todo collection.
//!
//! Handlers only parse the request, call `TodoService`, and serialize the
//! result. All error rendering lives in `ServiceError::into_response`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ServiceError;
use crate::model::{TodoId, TodoItem};
use crate::service::TodoService;

/// Request payload for creating a todo. A missing `body` is treated like an
/// empty one and rejected by validation.
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
}

pub fn router(service: TodoService) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo).patch(toggle_todo).delete(delete_todo),
        )
        .with_state(service)
}

fn parse_id(raw: &str) -> Result<TodoId, ServiceError> {
    Ok(raw.parse::<TodoId>()?)
}

#[instrument(skip(service))]
async fn list_todos(
    State(service): State<TodoService>,
) -> Result<Json<Vec<TodoItem>>, ServiceError> {
    service.list().await.map(Json)
}

#[instrument(skip(service, payload))]
async fn create_todo(
    State(service): State<TodoService>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItem>), ServiceError> {
    let Json(input) =
        payload.map_err(|rejection| ServiceError::Validation(rejection.body_text()))?;
    let todo = service.create(input.body).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(service))]
async fn get_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ServiceError> {
    service.find(parse_id(&id)?).await.map(Json)
}

#[instrument(skip(service))]
async fn toggle_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ServiceError> {
    service.toggle(parse_id(&id)?).await.map(Json)
}

#[instrument(skip(service))]
async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ServiceError> {
    service.delete(parse_id(&id)?).await?;
    Ok(Json(DeleteResponse { success: true }))
}
