//! Request Processing Module
//!
//! Validates inbound requests against the single suggest endpoint and builds
//! the structured answer or an error response.
//!
//! ## Pipeline
//! 1. **Method**: only `POST` is accepted; anything else is a bad request.
//! 2. **Path**: the request target must be exactly `/v1/api/suggest`, query
//!    strings included; anything else is not found.
//! 3. **Body**: must parse as JSON, otherwise the parser's message is returned.
//! 4. **Field**: the document must carry a string `input`, otherwise a usage hint is returned.
//! 5. **Lookup**: the shared index is queried and the matches are rendered.

pub mod handler;
pub mod types;

pub use handler::{RequestProcessor, error_reply, extract_query, wants_keep_alive};
pub use types::{
    METHOD_NOT_ALLOWED_MESSAGE, RequestError, SUGGEST_PATH, SuggestRequest, USAGE_MESSAGE,
};
