//! Error types shared across the service.
//!
//! Request-level failures are not here: they are values of
//! [`crate::processor::RequestError`] and always become a 4xx response.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a fresh entry set from the suggestion source.
///
/// Never surfaced to request callers: the index logs it and keeps serving
/// whatever it held before.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Can't read suggestions file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed suggestions document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Connection-level failure. Fatal to one connection only.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to read request body: {0}")]
    Body(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Flag {0} requires a value")]
    MissingValue(String),

    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}
