//! Connection Worker Module
//!
//! One worker per accepted connection. A worker only shares the suggestion
//! index with the rest of the process, so a slow or broken client never holds
//! up anybody else.
//!
//! ## Lifecycle
//! - **Serving**: hyper's HTTP/1 connection frames each request; the body is
//!   buffered up to a limit and handed to the processor. Keep-alive is on.
//! - **Closed**: end of stream, or a close asked for by either side.
//! - **Aborted**: malformed framing or an IO error; hyper answers 400 where it
//!   still can and drops the connection.
//!
//! ## Submodules
//! - **`connection`**: The `ConnectionWorker` and its hyper service.

pub mod connection;

pub use connection::{ConnectionWorker, DEFAULT_MAX_BODY_BYTES, WorkerExit};

#[cfg(test)]
mod tests;
