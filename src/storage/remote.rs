use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};

use super::protocol::*;
use super::types::{HistoryEntry, Revision, StageError, StageResult};
use crate::board::types::BoardDocument;
use crate::config::RemoteConfig;

/// Versioned remote backend: one file in a GitHub repository.
///
/// Every write is a commit, guarded by the revision token of the version it
/// replaces. All calls share the client-wide timeout from [`RemoteConfig`].
pub struct GithubStore {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl GithubStore {
    pub fn new(config: RemoteConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn repo(&self) -> &str {
        &self.config.repo
    }

    pub fn branch(&self) -> &str {
        &self.config.branch
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(AUTHORIZATION, format!("token {}", self.config.token))
            .header(ACCEPT, ACCEPT_GITHUB_V3)
    }

    async fn get_contents(&self) -> StageResult<ContentsResponse> {
        let url = self.url(&contents_path(&self.config.repo, &self.config.path));
        let response = self
            .authorized(self.client.get(url))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        let response = check_status(response).await?;
        response
            .json::<ContentsResponse>()
            .await
            .map_err(|e| StageError::Malformed(e.to_string()))
    }

    /// Fetches the document together with its revision token.
    pub async fn fetch(&self) -> StageResult<(BoardDocument, Revision)> {
        let contents = self.get_contents().await?;
        let bytes = decode_content(&contents.content)?;
        let document = BoardDocument::from_slice(&bytes).map_err(StageError::Malformed)?;

        Ok((document, Revision(contents.sha)))
    }

    /// Current revision token without parsing the content, so a corrupt remote
    /// file can still be overwritten. `None` means the file does not exist yet.
    pub async fn fetch_revision(&self) -> StageResult<Option<Revision>> {
        match self.get_contents().await {
            Ok(contents) => Ok(Some(Revision(contents.sha))),
            Err(StageError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Commits `document`, replacing `revision` (or creating the file when `None`).
    ///
    /// Returns the new revision when the remote reports one.
    pub async fn store(
        &self,
        document: &BoardDocument,
        revision: Option<&Revision>,
        message: &str,
    ) -> StageResult<Option<Revision>> {
        let text = document
            .to_pretty_json()
            .map_err(|e| StageError::Malformed(e.to_string()))?;

        let payload = PutContentsRequest {
            message: message.to_string(),
            content: STANDARD.encode(text.as_bytes()),
            branch: self.config.branch.clone(),
            sha: revision.map(|r| r.0.clone()),
        };

        let url = self.url(&contents_path(&self.config.repo, &self.config.path));
        let response = self
            .authorized(self.client.put(url))
            .json(&payload)
            .send()
            .await?;

        let response = check_status(response).await?;
        let new_revision = match response.json::<PutContentsResponse>().await {
            Ok(body) => body.content.map(|c| Revision(c.sha)),
            Err(e) => {
                tracing::warn!("GitHub accepted the write but the response was unreadable: {}", e);
                None
            }
        };

        Ok(new_revision)
    }

    /// Most recent change records for the document, newest first.
    pub async fn history(&self, limit: usize) -> StageResult<Vec<HistoryEntry>> {
        let url = self.url(&commits_path(&self.config.repo));
        let per_page = limit.to_string();
        let response = self
            .authorized(self.client.get(url))
            .query(&[
                ("path", self.config.path.as_str()),
                ("sha", self.config.branch.as_str()),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        let response = check_status(response).await?;
        let commits: Vec<CommitRecord> = response
            .json()
            .await
            .map_err(|e| StageError::Malformed(e.to_string()))?;

        Ok(commits
            .into_iter()
            .take(limit)
            .map(|c| HistoryEntry {
                date: c.commit.author.date,
                message: c.commit.message,
                sha: c.sha.chars().take(SHORT_SHA_LEN).collect(),
            })
            .collect())
    }

    /// Read-only check of the repository itself (not the data file).
    pub async fn check_repository(&self) -> StageResult<String> {
        let url = self.url(&repo_path(&self.config.repo));
        let response = self.authorized(self.client.get(url)).send().await?;

        let response = check_status(response).await?;
        let repo: RepoResponse = response
            .json()
            .await
            .map_err(|e| StageError::Malformed(e.to_string()))?;

        Ok(repo.full_name)
    }
}

/// Maps non-2xx responses onto stage errors.
async fn check_status(response: Response) -> StageResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StageError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StageError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Decodes GitHub's line-wrapped base64 payload.
pub(crate) fn decode_content(content: &str) -> StageResult<Vec<u8>> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| StageError::Malformed(format!("invalid base64 content: {e}")))
}
