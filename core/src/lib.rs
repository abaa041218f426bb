//! Synchronous client core for the todo resource server.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round trip, keeping this crate deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only the API root URL.
//! - Each operation is split into `build_*` (produces the request) and
//!   `parse_*` (consumes the response), so the I/O boundary is explicit.
//! - DTOs are defined independently from the server crate; the live-server
//!   integration test catches schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateTodo, DeleteAck, ErrorBody, Todo};
