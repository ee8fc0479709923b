use serde_json::Value;

use super::error::ServiceError;
use super::types::{BoardDocument, StatusResponse};
use crate::storage::resolver::StorageResolver;
use crate::storage::types::{
    ConnectionStatus, HistoryEntry, Loaded, SaveReport, StageError, WriteReason,
};

/// Whole-document read/replace/reset over the storage resolver.
///
/// Holds no state besides the resolver; every call is one load or one save.
pub struct BoardService {
    storage: StorageResolver,
}

impl BoardService {
    pub fn new(storage: StorageResolver) -> Self {
        Self { storage }
    }

    pub fn status(&self) -> StatusResponse {
        let configured = self.storage.remote_configured();
        let remote = self.storage.remote();
        StatusResponse {
            status: "ok".to_string(),
            message: "KanBan API is running".to_string(),
            storage: if configured {
                "GitHub".to_string()
            } else {
                "Local file".to_string()
            },
            github_configured: configured,
            data_file: self.storage.local().path().display().to_string(),
            repo: remote.map(|r| r.repo().to_string()),
            branch: remote.map(|r| r.branch().to_string()),
        }
    }

    /// Current document with its origin. Never fails.
    pub async fn load(&self) -> Loaded {
        let loaded = self.storage.load().await;
        tracing::debug!("Loaded board from {}", loaded.source.as_str());
        loaded
    }

    pub async fn get_document(&self) -> BoardDocument {
        self.load().await.document
    }

    /// Same document as [`get_document`](Self::get_document); the handler adds the
    /// download hint.
    pub async fn export_backup(&self) -> BoardDocument {
        self.get_document().await
    }

    /// Validates a raw request body and replaces the stored document with it.
    pub async fn replace_document(&self, body: &[u8]) -> Result<SaveReport, ServiceError> {
        let document = parse_body(body)?;
        self.save(&document, WriteReason::Update).await
    }

    pub async fn reset_document(&self) -> Result<SaveReport, ServiceError> {
        self.save(&BoardDocument::default(), WriteReason::Reset).await
    }

    async fn save(
        &self,
        document: &BoardDocument,
        reason: WriteReason,
    ) -> Result<SaveReport, ServiceError> {
        let revision = self.storage.current_revision().await;
        let report = self.storage.save(document, revision.as_ref(), reason).await;

        if report.is_success() {
            tracing::info!(
                "Board saved ({}) to {}",
                reason.commit_message(),
                report.storage_label()
            );
            Ok(report)
        } else {
            Err(ServiceError::SaveFailed(report.failure_summary()))
        }
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, ServiceError> {
        match self.storage.history().await {
            Ok(entries) => Ok(entries),
            Err(StageError::NotConfigured) => Err(ServiceError::NotConfigured),
            Err(e) => {
                tracing::error!(status = ?e.status(), "History request failed: {}", e);
                Err(ServiceError::History(e))
            }
        }
    }

    pub async fn test_connection(&self) -> ConnectionStatus {
        self.storage.test_connection().await
    }
}

/// Empty bodies and empty JSON values (`null`, `{}`, `[]`, `""`) count as "no data".
pub fn parse_body(body: &[u8]) -> Result<BoardDocument, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceError::EmptyBody);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ServiceError::InvalidBody(format!("malformed JSON: {e}")))?;

    let empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if empty {
        return Err(ServiceError::EmptyBody);
    }

    BoardDocument::from_value(value).map_err(ServiceError::InvalidBody)
}
