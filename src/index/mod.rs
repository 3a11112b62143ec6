//! Suggestion Index Module
//!
//! Holds the in-memory, cost-sorted collection of suggestion entries and the
//! guarded handle through which it is shared.
//!
//! ## Overview
//! The index is read-only from the service's point of view. It is created
//! empty, populated by an initial load, and replaced wholesale on every
//! refresh. A failed load never takes the service down: the previous entries
//! (or an empty index on first start) keep being served.
//!
//! ## Submodules
//! - **`types`**: `SuggestionEntry` and the `SuggestionResult` returned by lookups.
//! - **`engine`**: `SuggestionIndex`, the load/sort/lookup algorithm.
//! - **`source`**: The `SuggestionSource` seam and the JSON file implementation.
//! - **`shared`**: `SharedIndex`, the lock-guarded handle used by the service.

pub mod engine;
pub mod shared;
pub mod source;
pub mod types;

pub use engine::SuggestionIndex;
pub use shared::SharedIndex;
pub use source::{JsonFileSource, SuggestionSource};
pub use types::{Suggestion, SuggestionEntry, SuggestionResult};
