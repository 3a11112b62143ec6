use crate::error::TransportError;
use crate::processor::{RequestProcessor, RequestError, error_reply};

use axum::body::Bytes;
use axum::http::{Request, Response};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncRead, AsyncWrite};

/// Largest request body a worker buffers before answering 413.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// How a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Orderly close after end of stream or a close negotiated by either side.
    Closed { requests: usize },
    /// A read, write or framing error dropped the connection.
    Aborted { requests: usize },
}

/// Drives one connection: read a request, answer it, repeat until the
/// connection should close.
///
/// Framing, keep-alive and `Expect: 100-continue` are handled by hyper's
/// HTTP/1 connection; every complete request goes through
/// [`RequestProcessor::process`].
pub struct ConnectionWorker<IO> {
    io: IO,
    processor: Arc<RequestProcessor>,
    peer: String,
    max_body_bytes: usize,
}

impl<IO> ConnectionWorker<IO>
where
    IO: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(
        io: IO,
        processor: Arc<RequestProcessor>,
        peer: impl Into<String>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            io,
            processor,
            peer: peer.into(),
            max_body_bytes,
        }
    }

    pub async fn run(self) -> WorkerExit {
        let served = Arc::new(AtomicUsize::new(0));
        let processor = self.processor;
        let max_body_bytes = self.max_body_bytes;
        let counter = served.clone();

        let service = service_fn(move |req: Request<Incoming>| {
            let processor = processor.clone();
            let counter = counter.clone();
            async move {
                let response = answer(&processor, req, max_body_bytes).await?;
                counter.fetch_add(1, Ordering::Relaxed);
                Ok::<_, TransportError>(response)
            }
        });

        let result = http1::Builder::new()
            .keep_alive(true)
            .half_close(true)
            .serve_connection(TokioIo::new(self.io), service)
            .await;

        let requests = served.load(Ordering::Relaxed);
        match result {
            Ok(()) => {
                tracing::debug!(
                    "Connection {} closed after {} requests",
                    self.peer,
                    requests
                );
                WorkerExit::Closed { requests }
            }
            Err(e) => {
                tracing::error!("Connection {} aborted: {}", self.peer, e);
                WorkerExit::Aborted { requests }
            }
        }
    }
}

/// Buffers the body of `req` up to `limit` bytes and hands it to the processor.
async fn answer(
    processor: &RequestProcessor,
    req: Request<Incoming>,
    limit: usize,
) -> Result<Response<Full<Bytes>>, TransportError> {
    let (parts, body) = req.into_parts();

    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            tracing::warn!("Rejecting request body over the {} byte limit", limit);
            let response = error_reply(RequestError::PayloadTooLarge { limit }, parts.version);
            return Ok(response.map(|body| Full::new(Bytes::from(body))));
        }
        Err(e) => return Err(TransportError::Body(e.to_string())),
    };

    let response = processor.process(&Request::from_parts(parts, bytes)).await;
    Ok(response.map(|body| Full::new(Bytes::from(body))))
}
