use axum::body::Bytes;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

use super::error::ServiceError;
use super::service::BoardService;
use super::types::{BoardDocument, StatusResponse, WriteResponse};
use crate::storage::types::{ConnectionStatus, HistoryEntry};

pub const BACKUP_FILENAME: &str = "kanban_backup.json";

pub async fn handle_status(
    Extension(service): Extension<Arc<BoardService>>,
) -> Json<StatusResponse> {
    Json(service.status())
}

pub async fn handle_get_data(
    Extension(service): Extension<Arc<BoardService>>,
) -> Json<BoardDocument> {
    Json(service.get_document().await)
}

pub async fn handle_put_data(
    Extension(service): Extension<Arc<BoardService>>,
    body: Bytes,
) -> Result<Json<WriteResponse>, ServiceError> {
    match service.replace_document(&body).await {
        Ok(report) => Ok(Json(WriteResponse {
            success: true,
            message: format!("Data saved to {}", report.storage_label()),
            storage: report.storage_label().to_string(),
        })),
        Err(e) => {
            tracing::error!("Failed to save board: {}", e);
            Err(e)
        }
    }
}

pub async fn handle_reset(
    Extension(service): Extension<Arc<BoardService>>,
) -> Result<Json<WriteResponse>, ServiceError> {
    match service.reset_document().await {
        Ok(report) => Ok(Json(WriteResponse {
            success: true,
            message: "Data reset to defaults".to_string(),
            storage: report.storage_label().to_string(),
        })),
        Err(e) => {
            tracing::error!("Failed to reset board: {}", e);
            Err(e)
        }
    }
}

pub async fn handle_backup(
    Extension(service): Extension<Arc<BoardService>>,
) -> impl IntoResponse {
    let document = service.export_backup().await;
    (
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={BACKUP_FILENAME}"),
        )],
        Json(document),
    )
}

pub async fn handle_history(
    Extension(service): Extension<Arc<BoardService>>,
) -> Result<Json<Vec<HistoryEntry>>, ServiceError> {
    service.history().await.map(Json)
}

pub async fn handle_test_github(
    Extension(service): Extension<Arc<BoardService>>,
) -> Json<ConnectionStatus> {
    Json(service.test_connection().await)
}
