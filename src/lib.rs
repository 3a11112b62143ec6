//! Suggestion Service Library
//!
//! Answers autocomplete lookups against an in-memory index that is reloaded
//! in the background while requests are being served.
//!
//! ## Architecture Modules
//! - **`index`**: The cost-sorted suggestion index, its source, and the
//!   lock-guarded `SharedIndex` handle.
//! - **`refresh`**: The background scheduler that reloads the index and swaps
//!   it into place on a fixed interval.
//! - **`processor`**: Validation of `POST /v1/api/suggest` requests and
//!   rendering of the JSON answer.
//! - **`worker`**: One HTTP/1 connection per worker, served with hyper.
//! - **`server`**: Startup, accept loop and shutdown.
//! - **`config`**: Command-line and environment configuration.

pub mod config;
pub mod error;
pub mod index;
pub mod processor;
pub mod refresh;
pub mod server;
pub mod worker;
