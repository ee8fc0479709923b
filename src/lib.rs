//! Kanban Board Persistence Backend
//!
//! A small REST service that reads and writes one JSON document describing a
//! kanban board (columns, tasks, ID counters, UI state).
//!
//! ## Modules
//! - **`board`**: The Board Document Service. Validates, defaults and serves the
//!   document through the HTTP API (read, replace, reset, backup, history).
//! - **`storage`**: The Storage Resolver. Chooses between a versioned remote store
//!   (a file in a GitHub repository) and a local JSON file, falling back from one
//!   to the other on read and writing to both.
//! - **`config`**: Immutable startup configuration read from the environment.
//! - **`server`**: Router assembly and the HTTP server loop.

pub mod board;
pub mod config;
pub mod server;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;
