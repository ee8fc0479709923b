//! Remote Store Wire Protocol
//!
//! Paths and Data Transfer Objects for the subset of the GitHub REST API used
//! by the remote backend: the contents endpoint (read/write one file), the
//! commits endpoint (history) and the repository endpoint (connectivity check).
//!
//! Only the fields the backend actually reads are modelled; everything else in
//! GitHub's responses is ignored by serde.

use serde::{Deserialize, Serialize};

/// Media type requested on every call.
pub const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";

/// Number of change records returned by the history endpoint.
pub const HISTORY_LIMIT: usize = 10;

/// Length of the shortened revision shown in history entries.
pub const SHORT_SHA_LEN: usize = 7;

// --- API Endpoints ---

/// `GET`/`PUT` a single file.
pub fn contents_path(repo: &str, path: &str) -> String {
    format!("/repos/{}/contents/{}", repo, path)
}

/// `GET` the commits touching a file.
pub fn commits_path(repo: &str) -> String {
    format!("/repos/{}/commits", repo)
}

/// `GET` repository metadata.
pub fn repo_path(repo: &str) -> String {
    format!("/repos/{}", repo)
}

// --- Data Transfer Objects ---

/// Response of `GET /repos/{repo}/contents/{path}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentsResponse {
    /// Blob SHA of the current file version (the revision token).
    pub sha: String,
    /// Base64 file body; GitHub wraps it with newlines every 60 characters.
    #[serde(default)]
    pub content: String,
}

/// Request body of `PUT /repos/{repo}/contents/{path}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PutContentsRequest {
    /// Commit message recorded for this write.
    pub message: String,
    /// Base64 encoded file body.
    pub content: String,
    pub branch: String,
    /// Revision being replaced; absent when creating the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Response of a successful contents `PUT`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PutContentsResponse {
    pub content: Option<ContentRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentRef {
    pub sha: String,
}

/// One element of `GET /repos/{repo}/commits`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub date: String,
}

/// Response of `GET /repos/{repo}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RepoResponse {
    pub full_name: String,
}
