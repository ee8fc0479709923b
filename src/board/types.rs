//! Board Data Types
//!
//! The persisted board document and the DTOs returned by the HTTP API.
//!
//! The server treats the board as an opaque pass-through store: the only thing
//! it checks is that a document is a JSON object carrying a `columns` key.
//! Columns, tasks, counters and UI state are kept exactly as the client sent them.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

/// The single JSON document representing the whole kanban board.
///
/// Expected keys are `columns` (each `{id, name, tasks: {major, minor}}`),
/// `nextColumnId`, `nextTaskId` and `dropdownStates`, but only `columns` is
/// required and none of them are type-checked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct BoardDocument(Map<String, Value>);

impl Serialize for BoardDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl TryFrom<Map<String, Value>> for BoardDocument {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        if !map.contains_key("columns") {
            return Err("document has no `columns` key".to_string());
        }
        Ok(Self(map))
    }
}

impl Default for BoardDocument {
    /// Three empty columns: To Do, In Progress, Done.
    fn default() -> Self {
        let columns: Vec<Value> = ["To Do", "In Progress", "Done"]
            .iter()
            .enumerate()
            .map(|(i, name)| json!({"id": i + 1, "name": name, "tasks": {"major": [], "minor": []}}))
            .collect();

        let mut map = Map::new();
        map.insert("columns".to_string(), Value::Array(columns));
        map.insert("nextColumnId".to_string(), json!(4));
        map.insert("nextTaskId".to_string(), json!(1));
        map.insert("dropdownStates".to_string(), json!({}));
        Self(map)
    }
}

impl BoardDocument {
    /// Interprets raw JSON as a board document.
    ///
    /// Fails only when the value is not an object or lacks `columns`.
    pub fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(map) => Self::try_from(map),
            _ => Err("document is not a JSON object".to_string()),
        }
    }

    /// Parses a document from raw bytes (file contents or decoded remote content).
    pub fn from_slice(bytes: &[u8]) -> Result<Self, String> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        Self::from_value(value)
    }

    pub fn columns(&self) -> &Value {
        &self.0["columns"]
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Pretty-printed JSON with a trailing newline, as stored on disk and remotely.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(&self.0)?;
        text.push('\n');
        Ok(text)
    }
}

/// Health/status payload for `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub storage: String,
    pub github_configured: bool,
    pub data_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Acknowledgment for replace and reset.
#[derive(Debug, Serialize, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
    pub message: String,
    /// Backends the write reached: `github+local`, `github` or `local`.
    pub storage: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
