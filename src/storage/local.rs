use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::types::{StageError, StageResult};
use crate::board::types::BoardDocument;

/// Flat-file backend: one pretty-printed JSON document on the serving host.
///
/// There is no locking; concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and validates the stored document.
    ///
    /// A missing file is `NotFound`; unparsable JSON or a document without
    /// `columns` is `Malformed`.
    pub async fn read(&self) -> StageResult<BoardDocument> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StageError::NotFound),
            Err(e) => return Err(StageError::Io(e)),
        };

        BoardDocument::from_slice(&bytes).map_err(StageError::Malformed)
    }

    /// Replaces the file with `document`, creating parent directories if needed.
    pub async fn write(&self, document: &BoardDocument) -> StageResult<()> {
        let text = document
            .to_pretty_json()
            .map_err(|e| StageError::Malformed(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, text).await?;
        tracing::debug!("Wrote board document to {}", self.path.display());
        Ok(())
    }
}
