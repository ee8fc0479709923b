use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::types::ErrorResponse;
use crate::storage::types::StageError;

/// Failures surfaced to API clients.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No data provided")]
    EmptyBody,
    #[error("Invalid board document: {0}")]
    InvalidBody(String),
    #[error("Failed to save data: {0}")]
    SaveFailed(String),
    #[error("GitHub not configured")]
    NotConfigured,
    #[error("Failed to fetch history: {0}")]
    History(StageError),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::EmptyBody | ServiceError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ServiceError::SaveFailed(_) | ServiceError::NotConfigured | ServiceError::History(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
