use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The single endpoint this service answers on.
pub const SUGGEST_PATH: &str = "/v1/api/suggest";

pub const USAGE_MESSAGE: &str = r#"JSON format: {"input" : "<user_input">}"#;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Unknown HTTP-method. You should use POST method";

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = concat!("suggest-service/", env!("CARGO_PKG_VERSION"));

/// Request body of the suggest endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub input: String,
}

/// Why a request could not be answered with suggestions.
///
/// The `Display` text of each variant is the plain-text response body.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Unknown HTTP-method. You should use POST method")]
    MethodNotAllowed,

    #[error("The resource '{0}' was not found.")]
    NotFound(String),

    #[error("{0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("JSON format: {{\"input\" : \"<user_input\">}}")]
    Usage,

    #[error("Request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to render suggestions: {0}")]
    Render(#[source] serde_json::Error),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::MethodNotAllowed
            | RequestError::InvalidJson(_)
            | RequestError::Usage => StatusCode::BAD_REQUEST,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RequestError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
