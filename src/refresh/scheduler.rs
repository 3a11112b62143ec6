//! Periodic Index Refresh
//!
//! Wakes on a fixed interval, builds a fresh index from the source outside
//! any lock, and swaps it into the shared handle in one step.
//!
//! ## Responsibilities
//! - **Scheduling**: one long-lived task, first refresh one full interval after start.
//! - **Fail-open**: a failed fetch is logged and the installed index stays as it is.
//! - **Serialisation**: at most one refresh is in flight at any time.

use crate::index::{SharedIndex, SuggestionIndex, SuggestionSource};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default refresh period.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// What a single refresh cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A fresh index with this many entries was installed.
    Replaced { entries: usize },
    /// The source could not be read; the installed index was kept.
    Kept { entries: usize },
}

pub struct RefreshScheduler {
    /// Handle the fresh index is installed into.
    index: SharedIndex,
    /// Where fresh entry sets come from.
    source: Arc<dyn SuggestionSource>,
    /// Time between two refreshes.
    interval: Duration,
    /// Held for the whole fetch-and-swap of one refresh.
    in_flight: Mutex<()>,
}

impl RefreshScheduler {
    pub fn new(
        index: SharedIndex,
        source: Arc<dyn SuggestionSource>,
        interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            index,
            source,
            interval,
            in_flight: Mutex::new(()),
        })
    }

    /// Spawns the refresh loop and returns its handle.
    ///
    /// The loop runs until the handle is aborted or the runtime shuts down.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tracing::info!(
            "Refreshing suggestions from {} every {:?}",
            self.source.describe(),
            self.interval
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the initial load already happened.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                self.refresh_once().await;
            }
        })
    }

    /// Performs one fetch-sort-swap cycle.
    pub async fn refresh_once(&self) -> RefreshOutcome {
        let _in_flight = self.in_flight.lock().await;

        match SuggestionIndex::fetch(self.source.as_ref()).await {
            Ok(fresh) => {
                let entries = fresh.len();
                let previous = self.index.replace(fresh).await;
                tracing::info!(
                    "Refreshed suggestions: {} -> {} entries",
                    previous.len(),
                    entries
                );
                RefreshOutcome::Replaced { entries }
            }
            Err(e) => {
                let entries = self.index.len().await;
                tracing::warn!(
                    "Refresh from {} failed, serving {} existing entries: {}",
                    self.source.describe(),
                    entries,
                    e
                );
                RefreshOutcome::Kept { entries }
            }
        }
    }
}
