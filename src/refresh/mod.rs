//! Refresh Module
//!
//! Keeps the shared suggestion index in step with its source by reloading it
//! in the background on a fixed interval.

pub mod scheduler;

pub use scheduler::{DEFAULT_REFRESH_INTERVAL, RefreshOutcome, RefreshScheduler};
