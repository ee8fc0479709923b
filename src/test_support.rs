//! Shared test fixtures: an in-process mock of the GitHub REST endpoints the
//! remote backend talks to, and helpers to wire resolvers and services around it.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::board::service::BoardService;
use crate::board::types::BoardDocument;
use crate::config::RemoteConfig;
use crate::storage::local::LocalStore;
use crate::storage::protocol::PutContentsRequest;
use crate::storage::remote::GithubStore;
use crate::storage::resolver::StorageResolver;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_REPO: &str = "octo/board";

/// The board from the API example: one column, counters 2 and 1.
pub const SAMPLE_BOARD_JSON: &str = r#"{"columns":[{"id":1,"name":"X","tasks":{"major":[],"minor":[]}}],"nextColumnId":2,"nextTaskId":1,"dropdownStates":{}}"#;

pub fn sample_document() -> BoardDocument {
    BoardDocument::from_slice(SAMPLE_BOARD_JSON.as_bytes()).unwrap()
}

#[derive(Debug, Clone)]
pub struct MockCommit {
    pub sha: String,
    pub message: String,
    pub date: String,
}

/// State of the fake repository.
#[derive(Debug, Default)]
pub struct MockRepo {
    /// Raw file text and its blob SHA.
    pub file: Option<(String, String)>,
    /// Oldest first.
    pub commits: Vec<MockCommit>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Delay applied to contents reads and writes before answering.
    pub stall: Option<Duration>,
    pub put_count: usize,
    /// `sha` field of every PUT received, in order.
    pub put_shas: Vec<Option<String>>,
    counter: u64,
}

impl MockRepo {
    pub fn seed_file(&mut self, text: &str) -> String {
        self.counter += 1;
        let sha = format!("{:040x}", self.counter);
        self.file = Some((text.to_string(), sha.clone()));
        sha
    }

    pub fn file_text(&self) -> Option<String> {
        self.file.as_ref().map(|(text, _)| text.clone())
    }

    pub fn file_document(&self) -> Option<BoardDocument> {
        self.file
            .as_ref()
            .and_then(|(text, _)| BoardDocument::from_slice(text.as_bytes()).ok())
    }
}

type Shared = Arc<Mutex<MockRepo>>;

pub struct MockGithub {
    pub addr: SocketAddr,
    pub repo: Shared,
}

impl MockGithub {
    pub fn remote_config(&self) -> RemoteConfig {
        remote_config_for(format!("http://{}", self.addr))
    }

    pub fn store(&self) -> GithubStore {
        GithubStore::new(self.remote_config()).unwrap()
    }

    pub fn store_with_timeout(&self, timeout: Duration) -> GithubStore {
        let mut config = self.remote_config();
        config.timeout = timeout;
        GithubStore::new(config).unwrap()
    }
}

pub fn remote_config_for(api_base: String) -> RemoteConfig {
    RemoteConfig {
        token: TEST_TOKEN.to_string(),
        repo: TEST_REPO.to_string(),
        branch: "main".to_string(),
        path: "kanban-data.json".to_string(),
        api_base,
        timeout: Duration::from_secs(5),
    }
}

/// Starts the fake API on an ephemeral port.
pub async fn spawn_mock_github() -> MockGithub {
    let repo: Shared = Arc::new(Mutex::new(MockRepo::default()));

    let app = Router::new()
        .route("/repos/:owner/:name", get(get_repo))
        .route("/repos/:owner/:name/commits", get(get_commits))
        .route(
            "/repos/:owner/:name/contents/*path",
            get(get_contents).put(put_contents),
        )
        .with_state(repo.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockGithub { addr, repo }
}

/// An API base nothing listens on, so every call fails at connect time.
pub async fn unreachable_api_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn resolver(remote: Option<GithubStore>, data_file: &std::path::Path) -> StorageResolver {
    StorageResolver::from_parts(remote, LocalStore::new(data_file))
}

pub fn service(remote: Option<GithubStore>, data_file: &std::path::Path) -> Arc<BoardService> {
    Arc::new(BoardService::new(resolver(remote, data_file)))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("token {TEST_TOKEN}"))
}

async fn stall(repo: &Shared) {
    let delay = repo.lock().unwrap().stall;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

fn repo_matches(owner: &str, name: &str) -> bool {
    format!("{owner}/{name}") == TEST_REPO
}

async fn get_repo(
    State(_repo): State<Shared>,
    Path((owner, name)): Path<(String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
    }
    if !repo_matches(&owner, &name) {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})));
    }
    (
        StatusCode::OK,
        Json(json!({"full_name": TEST_REPO, "private": true, "default_branch": "main"})),
    )
}

async fn get_commits(
    State(repo): State<Shared>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
    }
    let repo = repo.lock().unwrap();
    if repo.fail_reads {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"})));
    }
    let commits: Vec<Value> = repo
        .commits
        .iter()
        .rev()
        .map(|c| {
            json!({
                "sha": c.sha,
                "commit": {"message": c.message, "author": {"name": "tester", "date": c.date}},
            })
        })
        .collect();
    (StatusCode::OK, Json(Value::Array(commits)))
}

async fn get_contents(
    State(repo): State<Shared>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    stall(&repo).await;
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
    }
    let repo = repo.lock().unwrap();
    if repo.fail_reads {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"})));
    }
    match &repo.file {
        Some((text, sha)) => {
            let encoded = STANDARD.encode(text.as_bytes());
            // GitHub wraps the payload every 60 characters.
            let wrapped = encoded
                .as_bytes()
                .chunks(60)
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect::<Vec<_>>()
                .join("\n");
            (
                StatusCode::OK,
                Json(json!({"sha": sha, "content": wrapped, "encoding": "base64"})),
            )
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))),
    }
}

async fn put_contents(
    State(repo): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<PutContentsRequest>,
) -> (StatusCode, Json<Value>) {
    stall(&repo).await;
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
    }
    let mut repo = repo.lock().unwrap();
    repo.put_count += 1;
    repo.put_shas.push(req.sha.clone());

    if repo.fail_writes {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"})));
    }

    let created = repo.file.is_none();
    let current_sha = repo.file.as_ref().map(|(_, sha)| sha.clone());
    if current_sha != req.sha {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "sha does not match"})),
        );
    }

    let Ok(bytes) = STANDARD.decode(req.content.as_bytes()) else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"message": "bad content"})));
    };
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let sha = repo.seed_file(&text);
    let n = repo.commits.len();
    repo.commits.push(MockCommit {
        sha: sha.clone(),
        message: req.message,
        date: format!("2026-01-01T00:00:{:02}Z", n % 60),
    });

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(json!({"content": {"sha": sha}})))
}
