use super::engine::SuggestionIndex;
use super::types::SuggestionResult;

use std::sync::Arc;
use tokio::sync::RwLock;

/// The single authoritative index, shared between the refresher and every
/// connection worker.
///
/// The entries are only reachable through the guarded accessors below, and
/// each guard lives exactly as long as the method that took it.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<SuggestionIndex>>,
}

impl SharedIndex {
    pub fn new(index: SuggestionIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Runs a lookup against whichever index is installed right now.
    pub async fn lookup(&self, input: &str) -> SuggestionResult {
        let index = self.inner.read().await;
        index.lookup(input)
    }

    /// Installs `fresh` in one step and returns the index it displaced.
    pub async fn replace(&self, fresh: SuggestionIndex) -> SuggestionIndex {
        let mut index = self.inner.write().await;
        std::mem::replace(&mut *index, fresh)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
