//! Wire DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's JSON but are defined independently, so the
//! client does not pull in axum or sqlx. The live-server integration test
//! catches schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API. `id` is assigned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub body: String,
    pub completed: bool,
}

/// Request payload for creating a new todo. New todos always start out not
/// completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub body: String,
}

/// Acknowledgement returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAck {
    pub success: bool,
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}
