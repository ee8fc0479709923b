//! Process Configuration
//!
//! Everything the service needs to know about its environment is read once at
//! startup into an immutable [`Config`] and handed to the constructors that need
//! it. Nothing reads the environment after that point.
//!
//! ## Sources
//! - **Environment**: remote credentials, repository, branch, listen port.
//! - **Flags**: `--bind <addr:port>` and `--data-file <path>` override the
//!   environment for local runs.

use anyhow::{Context, Result, anyhow, bail};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATA_FILE: &str = "kanban-data.json";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the GitHub-backed remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Personal access token sent as `Authorization: token <..>`.
    pub token: String,
    /// Repository in `owner/name` form.
    pub repo: String,
    pub branch: String,
    /// Path of the board document inside the repository.
    pub path: String,
    /// API base URL without a trailing slash.
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_file: PathBuf,
    /// `None` means local-file-only mode.
    pub remote: Option<RemoteConfig>,
}

impl Config {
    /// Builds the configuration from the real process environment and CLI flags.
    pub fn from_env() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_lookup(|key| std::env::var(key).ok(), &args)
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// `args` are the command-line arguments without the program name.
    pub fn from_lookup<F>(lookup: F, args: &[String]) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host: IpAddr = var("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .parse()
            .context("HOST is not a valid IP address")?;
        let port: u16 = match var("PORT") {
            Some(p) => p.parse().with_context(|| format!("PORT is not a valid port: {p}"))?,
            None => DEFAULT_PORT,
        };
        let mut bind_addr = SocketAddr::new(host, port);

        let mut data_file =
            PathBuf::from(var("KANBAN_DATA_FILE").unwrap_or_else(|| DEFAULT_DATA_FILE.to_string()));

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    let value = args.get(i + 1).ok_or_else(|| anyhow!("--bind needs a value"))?;
                    bind_addr = value
                        .parse()
                        .with_context(|| format!("--bind is not a socket address: {value}"))?;
                    i += 2;
                }
                "--data-file" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow!("--data-file needs a value"))?;
                    data_file = PathBuf::from(value);
                    i += 2;
                }
                other => {
                    tracing::warn!("Ignoring unknown argument {}", other);
                    i += 1;
                }
            }
        }

        let remote = match (var("GITHUB_TOKEN"), var("GITHUB_REPO")) {
            (Some(token), Some(repo)) => {
                validate_repo(&repo)?;
                let timeout = match var("REMOTE_TIMEOUT_SECS") {
                    Some(s) => Duration::from_secs(
                        s.parse()
                            .with_context(|| format!("REMOTE_TIMEOUT_SECS is not a number: {s}"))?,
                    ),
                    None => DEFAULT_REMOTE_TIMEOUT,
                };
                Some(RemoteConfig {
                    token,
                    repo,
                    branch: var("GITHUB_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
                    path: var("GITHUB_DATA_PATH")
                        .map(|p| p.trim_start_matches('/').to_string())
                        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string()),
                    api_base: var("GITHUB_API_URL")
                        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                        .trim_end_matches('/')
                        .to_string(),
                    timeout,
                })
            }
            _ => None,
        };

        Ok(Self {
            bind_addr,
            data_file,
            remote,
        })
    }

    pub fn remote_configured(&self) -> bool {
        self.remote.is_some()
    }
}

fn validate_repo(repo: &str) -> Result<()> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(())
        }
        _ => bail!("GITHUB_REPO must look like owner/name, got {repo}"),
    }
}
