//! Service Assembly
//!
//! Wires the pieces together: initial index load, background refresh, and the
//! accept loop that hands every connection to its own worker task.
//!
//! ## Responsibilities
//! - **Startup**: load the index once (fail-open) and bind the listener.
//! - **Admission**: optionally cap the number of live workers with a semaphore.
//! - **Shutdown**: stop accepting and stop refreshing when the shutdown future resolves.

use crate::config::ServiceConfig;
use crate::index::{JsonFileSource, SharedIndex, SuggestionIndex, SuggestionSource};
use crate::processor::RequestProcessor;
use crate::refresh::RefreshScheduler;
use crate::worker::ConnectionWorker;

use anyhow::Result;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

/// Accepts connections and spawns one worker per connection.
pub struct SuggestServer {
    listener: TcpListener,
    processor: Arc<RequestProcessor>,
    /// `None` admits connections without limit.
    admission: Option<Arc<Semaphore>>,
    max_body_bytes: usize,
}

impl SuggestServer {
    pub async fn bind(config: &ServiceConfig, index: SharedIndex) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;

        Ok(Self {
            listener,
            processor: Arc::new(RequestProcessor::new(index)),
            admission: config
                .max_connections
                .map(|limit| Arc::new(Semaphore::new(limit))),
            max_body_bytes: config.max_body_bytes,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop until `shutdown` resolves.
    ///
    /// Workers already running are left to finish on their own.
    pub async fn serve_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let permit = match &self.admission {
                Some(admission) => tokio::select! {
                    permit = admission.clone().acquire_owned() => match permit {
                        Ok(permit) => Some(permit),
                        Err(_) => break,
                    },
                    _ = &mut shutdown => break,
                },
                None => None,
            };

            let (stream, peer) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        continue;
                    }
                },
                _ = &mut shutdown => break,
            };

            tracing::debug!("Accepted connection from {}", peer);
            let worker = ConnectionWorker::new(
                stream,
                self.processor.clone(),
                peer.to_string(),
                self.max_body_bytes,
            );

            tokio::spawn(async move {
                let _permit = permit;
                let exit = worker.run().await;
                tracing::debug!("Connection {} finished: {:?}", peer, exit);
            });
        }

        tracing::info!("Stopped accepting connections");
    }
}

/// A bound, loaded service that has not started serving yet.
pub struct Service {
    pub index: SharedIndex,
    pub scheduler: Arc<RefreshScheduler>,
    pub server: SuggestServer,
}

impl Service {
    /// Loads the index from the configured file and binds the listener.
    pub async fn start(config: &ServiceConfig) -> Result<Self> {
        let source: Arc<dyn SuggestionSource> = Arc::new(JsonFileSource::new(&config.source_path));
        Self::start_with_source(config, source).await
    }

    pub async fn start_with_source(
        config: &ServiceConfig,
        source: Arc<dyn SuggestionSource>,
    ) -> Result<Self> {
        let mut initial = SuggestionIndex::new();
        if !initial.load(source.as_ref()).await {
            tracing::warn!("Starting with an empty suggestion index");
        }

        let index = SharedIndex::new(initial);
        let scheduler = RefreshScheduler::new(index.clone(), source, config.refresh_interval);
        let server = SuggestServer::bind(config, index.clone()).await?;

        Ok(Self {
            index,
            scheduler,
            server,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.server.local_addr()
    }

    /// Serves and refreshes until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("HTTP server listening on {}", self.local_addr()?);

        let refresher = self.scheduler.clone().start();
        self.server.serve_until(shutdown).await;
        refresher.abort();

        Ok(())
    }
}
