use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_server::{store, Config, ConfigError, StoreError, TodoService};

#[derive(Debug, Error)]
enum BootError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the real environment still applies.
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(error) = serve().await {
        error!(%error, "todo server failed");
        std::process::exit(1);
    }
}

async fn serve() -> Result<(), BootError> {
    let config = Config::from_env()?;

    let store = store::open(&config.storage).await?;

    let service = TodoService::with_timeout(Arc::clone(&store), config.store_timeout);
    let app = todo_server::app(service)
        .layer(config.cors_layer())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on http://{addr}");

    let served = todo_server::run(listener, app, todo_server::shutdown_signal()).await;
    store.close().await;
    info!("store closed");
    Ok(served?)
}
