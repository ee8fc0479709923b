//! Storage Resolver Module
//!
//! Decides, per request, where the board document lives and keeps the
//! available backends in sync.
//!
//! ## Backends
//! - **Remote** (`GithubStore`): one file in a GitHub repository. Every write is a
//!   commit guarded by a revision token (compare-and-swap on the blob SHA).
//! - **Local** (`LocalStore`): a pretty-printed JSON file on the serving host,
//!   used as fallback on read and as backup on every write.
//!
//! ## Policy
//! - **Read**: remote -> local file -> default document. Each stage yields a
//!   `StageResult`; failures are logged and demote to the next stage.
//! - **Write**: remote (if configured) and local, succeeding if either does.
//!   Favors availability over consistency; the board has a single writer in practice.

pub mod local;
pub mod protocol;
pub mod remote;
pub mod resolver;
pub mod types;
