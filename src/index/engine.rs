use super::source::SuggestionSource;
use super::types::{SuggestionEntry, SuggestionResult};
use crate::error::IndexError;

/// Cost-sorted, in-memory collection of suggestion entries.
///
/// After every successful [`load`](Self::load) the entries are ordered by
/// ascending `cost`, ties keeping the order they had in the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionIndex {
    entries: Vec<SuggestionEntry>,
}

impl SuggestionIndex {
    /// An empty index. Lookups on it always return no matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from an already fetched entry set, sorting it.
    pub fn from_entries(entries: Vec<SuggestionEntry>) -> Self {
        let mut index = Self { entries };
        index.sort();
        index
    }

    /// Fetches a complete, sorted index from `source`.
    pub async fn fetch(source: &dyn SuggestionSource) -> Result<Self, IndexError> {
        let entries = source.fetch().await?;
        Ok(Self::from_entries(entries))
    }

    /// Reloads the entry set from `source` in place.
    ///
    /// A failed read is logged and leaves the current entries untouched.
    /// Returns whether the entries were replaced.
    pub async fn load(&mut self, source: &dyn SuggestionSource) -> bool {
        match Self::fetch(source).await {
            Ok(fresh) => {
                tracing::info!(
                    "Loaded {} suggestions from {}",
                    fresh.len(),
                    source.describe()
                );
                *self = fresh;
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Keeping {} existing suggestions, load from {} failed: {}",
                    self.len(),
                    source.describe(),
                    e
                );
                false
            }
        }
    }

    /// Stable sort by ascending cost.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    }

    /// Collects every entry whose id equals `input`, in index order.
    ///
    /// Linear in the number of entries.
    pub fn lookup(&self, input: &str) -> SuggestionResult {
        let mut result = SuggestionResult::default();
        if input.is_empty() {
            return result;
        }

        for entry in self.entries.iter().filter(|e| e.id == input) {
            result.push(entry.name.clone());
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[SuggestionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
