use super::local::LocalStore;
use super::protocol::HISTORY_LIMIT;
use super::remote::GithubStore;
use super::types::*;
use crate::board::types::BoardDocument;
use crate::config::Config;

/// Presents the remote store and the local file as a single document store.
///
/// Reads walk the chain remote -> local file -> default document, each stage
/// returning a [`StageResult`]. Writes go to every configured backend and
/// succeed when any of them succeeds.
pub struct StorageResolver {
    remote: Option<GithubStore>,
    local: LocalStore,
}

impl StorageResolver {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let remote = match &config.remote {
            Some(remote_config) => Some(GithubStore::new(remote_config.clone())?),
            None => None,
        };

        Ok(Self::from_parts(remote, LocalStore::new(config.data_file.clone())))
    }

    pub fn from_parts(remote: Option<GithubStore>, local: LocalStore) -> Self {
        Self { remote, local }
    }

    pub fn remote(&self) -> Option<&GithubStore> {
        self.remote.as_ref()
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    /// Loads the board, never failing: the worst case is the default document.
    pub async fn load(&self) -> Loaded {
        match self.load_remote().await {
            Ok(loaded) => loaded,
            Err(StageError::NotConfigured) => self.load_local().await,
            Err(err) => {
                tracing::warn!(
                    status = ?err.status(),
                    "Remote read failed, falling back to local file: {}",
                    err
                );
                self.load_local().await
            }
        }
    }

    /// Remote stage of the read chain.
    pub async fn load_remote(&self) -> StageResult<Loaded> {
        let remote = self.remote.as_ref().ok_or(StageError::NotConfigured)?;
        let (document, revision) = remote.fetch().await?;

        Ok(Loaded {
            document,
            revision: Some(revision),
            source: SourceTag::Remote,
        })
    }

    /// Local stage of the read chain, including the default fallback.
    pub async fn load_local(&self) -> Loaded {
        let path = self.local.path().display();

        match self.local.read().await {
            Ok(document) => Loaded {
                document,
                revision: None,
                source: SourceTag::Local,
            },
            Err(StageError::NotFound) => {
                let document = BoardDocument::default();
                if let Err(e) = self.local.write(&document).await {
                    tracing::error!("Failed to initialize {} with defaults: {}", path, e);
                    return default_loaded(SourceTag::Default);
                }
                tracing::info!("Initialized {} with the default board", path);
                default_loaded(SourceTag::Initialized)
            }
            Err(e) => {
                tracing::warn!("Ignoring unusable local board {}: {}", path, e);
                default_loaded(SourceTag::Default)
            }
        }
    }

    /// Freshest remote revision token, so a write does not reuse a stale one.
    ///
    /// `None` when the remote is not configured, unreachable, or has no file yet.
    pub async fn current_revision(&self) -> Option<Revision> {
        let remote = self.remote.as_ref()?;
        match remote.fetch_revision().await {
            Ok(revision) => revision,
            Err(e) => {
                tracing::warn!(status = ?e.status(), "Could not read remote revision: {}", e);
                None
            }
        }
    }

    /// Writes `document` to the remote (if configured) and always to the local file.
    pub async fn save(
        &self,
        document: &BoardDocument,
        revision: Option<&Revision>,
        reason: WriteReason,
    ) -> SaveReport {
        let remote = match &self.remote {
            Some(remote) => {
                let result = remote
                    .store(document, revision, reason.commit_message())
                    .await;
                if let Err(e) = &result {
                    tracing::error!(status = ?e.status(), "Remote write failed: {}", e);
                }
                Some(result)
            }
            None => None,
        };

        let local = self.local.write(document).await;
        if let Err(e) = &local {
            tracing::error!(
                "Local write to {} failed: {}",
                self.local.path().display(),
                e
            );
        }

        let report = SaveReport { remote, local };
        if report.remote.is_some() && !report.remote_ok() && report.local_ok() {
            tracing::warn!("Board saved locally only; the remote copy is now stale");
        }
        report
    }

    /// Lightweight, side-effect-free check of the remote repository.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let Some(remote) = &self.remote else {
            return ConnectionStatus {
                configured: false,
                connected: false,
                repo: None,
                error: Some("GitHub not configured".to_string()),
            };
        };

        match remote.check_repository().await {
            Ok(full_name) => ConnectionStatus {
                configured: true,
                connected: true,
                repo: Some(full_name),
                error: None,
            },
            Err(e) => {
                tracing::warn!(status = ?e.status(), "GitHub connectivity check failed: {}", e);
                ConnectionStatus {
                    configured: true,
                    connected: false,
                    repo: Some(remote.repo().to_string()),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Most recent change records; `NotConfigured` without a remote.
    pub async fn history(&self) -> StageResult<Vec<HistoryEntry>> {
        let remote = self.remote.as_ref().ok_or(StageError::NotConfigured)?;
        remote.history(HISTORY_LIMIT).await
    }
}

fn default_loaded(source: SourceTag) -> Loaded {
    Loaded {
        document: BoardDocument::default(),
        revision: None,
        source,
    }
}
