use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::board::handlers::*;
use crate::board::service::BoardService;
use crate::config::Config;
use crate::storage::resolver::StorageResolver;

pub const ENDPOINT_STATUS: &str = "/";
pub const ENDPOINT_DATA: &str = "/api/data";
pub const ENDPOINT_RESET: &str = "/api/reset";
pub const ENDPOINT_BACKUP: &str = "/api/backup";
pub const ENDPOINT_HISTORY: &str = "/api/history";
pub const ENDPOINT_TEST_GITHUB: &str = "/api/test-github";

/// Assembles the HTTP API around a board service.
pub fn router(service: Arc<BoardService>) -> Router {
    Router::new()
        .route(ENDPOINT_STATUS, get(handle_status))
        .route(ENDPOINT_DATA, get(handle_get_data).post(handle_put_data))
        .route(ENDPOINT_RESET, post(handle_reset))
        .route(ENDPOINT_BACKUP, get(handle_backup))
        .route(ENDPOINT_HISTORY, get(handle_history))
        .route(ENDPOINT_TEST_GITHUB, get(handle_test_github))
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Wires storage and service from `config` and serves until Ctrl+C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let storage = StorageResolver::new(&config)?;
    match storage.remote() {
        Some(remote) => tracing::info!(
            "Storage: GitHub {} (branch {}) with local backup {}",
            remote.repo(),
            remote.branch(),
            config.data_file.display()
        ),
        None => tracing::info!(
            "Storage: local file {} (GitHub not configured)",
            config.data_file.display()
        ),
    }

    let service = Arc::new(BoardService::new(storage));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
