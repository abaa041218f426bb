//! REST resource server for todo items.
//!
//! # Overview
//! Four operations over one collection: list, create, toggle completion,
//! delete (plus a single-item lookup). Requests flow endpoint → service →
//! store and back; nothing calls upward.
//!
//! # Design
//! - `store::TodoStore` is the persistence seam. `SqliteStore` backs
//!   production, `MemoryStore` backs degraded mode and tests.
//! - `service::TodoService` owns validation, the toggle algorithm and the
//!   per-call store deadline. It receives the store handle at construction.
//! - `api` maps HTTP onto the service; `error::ServiceError` maps every
//!   failure onto exactly one status code with a `{"error": ...}` body.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod store;

use std::future::Future;

use axum::Router;
use tokio::{net::TcpListener, signal};

pub use api::{CreateTodo, DeleteResponse};
pub use config::{Config, ConfigError, Storage};
pub use error::{ErrorBody, ServiceError};
pub use model::{TodoId, TodoItem};
pub use service::TodoService;
pub use store::{MemoryStore, SqliteStore, StoreError, TodoStore};

/// Router with every todo route, without CORS or tracing layers.
pub fn app(service: TodoService) -> Router {
    api::router(service)
}

/// Serves `app` until `shutdown` completes, then drains in-flight requests.
pub async fn run(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Completes on Ctrl-C, or on SIGTERM where available.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
