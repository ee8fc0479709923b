//! Board Document Service Module
//!
//! Serves the single board document over a small synchronous REST API.
//!
//! ## Operations
//! - **Read** (`GET /api/data`): current document, falling back to defaults. Never fails.
//! - **Replace** (`POST /api/data`): whole-document write; 400 on an empty or
//!   malformed body, 500 when no backend accepted it.
//! - **Reset** (`POST /api/reset`): replace with the default three-column board.
//! - **Backup** (`GET /api/backup`): the document with a download filename hint.
//! - **History** (`GET /api/history`): last ten remote commits of the document.
//! - **Probe** (`GET /api/test-github`): remote connectivity check.

pub mod error;
pub mod handlers;
pub mod service;
pub mod types;
