use super::types::SuggestionEntry;
use crate::error::IndexError;

use async_trait::async_trait;
use std::path::PathBuf;

/// Where the index gets its entries from.
///
/// Each call returns the complete entry set; partial results are never
/// produced.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SuggestionEntry>, IndexError>;

    /// Human-readable name used in log lines.
    fn describe(&self) -> String;
}

/// A JSON document on disk holding an array of `{id, name, cost}` objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SuggestionSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<SuggestionEntry>, IndexError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| IndexError::Unreadable {
                path: self.path.clone(),
                source,
            })?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
