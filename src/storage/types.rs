use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::types::BoardDocument;

/// Opaque content version returned by the remote store (a blob SHA).
///
/// Supplying it on a write makes the write a compare-and-swap against that
/// version; omitting it asks the remote to create the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision(pub String);

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which stage of the fallback chain produced a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Read from the remote store.
    Remote,
    /// Read from the local file.
    Local,
    /// Local file was missing and has been created with the default document.
    Initialized,
    /// Nothing usable was found; the default document was returned unpersisted.
    Default,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Remote => "remote",
            SourceTag::Local => "local",
            SourceTag::Initialized => "initialized",
            SourceTag::Default => "default",
        }
    }
}

/// Why a single backend stage did not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("backend not configured")]
    NotConfigured,
    #[error("document not found")]
    NotFound,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed content: {0}")]
    Malformed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StageError {
    /// HTTP status reported by the remote, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            StageError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StageError {
    fn from(e: reqwest::Error) -> Self {
        StageError::Transport(e.to_string())
    }
}

pub type StageResult<T> = Result<T, StageError>;

/// Result of [`StorageResolver::load`](super::resolver::StorageResolver::load).
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub document: BoardDocument,
    /// Only set when the document came from the remote.
    pub revision: Option<Revision>,
    pub source: SourceTag,
}

/// Per-backend outcome of a save.
#[derive(Debug)]
pub struct SaveReport {
    /// `None` when no remote is configured; `Ok` carries the new revision if the
    /// remote returned one.
    pub remote: Option<StageResult<Option<Revision>>>,
    pub local: StageResult<()>,
}

impl SaveReport {
    pub fn remote_ok(&self) -> bool {
        matches!(self.remote, Some(Ok(_)))
    }

    pub fn local_ok(&self) -> bool {
        self.local.is_ok()
    }

    /// A save succeeds when at least one backend accepted the document.
    pub fn is_success(&self) -> bool {
        self.remote_ok() || self.local_ok()
    }

    /// Names the backends the write reached.
    pub fn storage_label(&self) -> &'static str {
        match (self.remote_ok(), self.local_ok()) {
            (true, true) => "github+local",
            (true, false) => "github",
            (false, true) => "local",
            (false, false) => "none",
        }
    }

    /// Human-readable summary of every failed stage.
    pub fn failure_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(Err(e)) = &self.remote {
            parts.push(format!("github: {e}"));
        }
        if let Err(e) = &self.local {
            parts.push(format!("local: {e}"));
        }
        parts.join("; ")
    }
}

/// One change record for the board document, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub message: String,
    /// Short (7 character) revision identifier.
    pub sha: String,
}

/// Result of the remote connectivity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub configured: bool,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reason attached to a remote write, used as the commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteReason {
    Update,
    Reset,
}

impl WriteReason {
    pub fn commit_message(&self) -> &'static str {
        match self {
            WriteReason::Update => "Update kanban data",
            WriteReason::Reset => "Reset kanban data to defaults",
        }
    }
}
