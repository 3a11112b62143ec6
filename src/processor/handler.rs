use super::types::*;
use crate::index::{SharedIndex, SuggestionResult};

use axum::body::Bytes;
use axum::http::header::{CONNECTION, CONTENT_TYPE, SERVER};
use axum::http::{HeaderValue, Method, Request, Response, StatusCode, Version};

/// Turns one wire-level request into one response, reading the shared index.
#[derive(Debug, Clone)]
pub struct RequestProcessor {
    index: SharedIndex,
}

impl RequestProcessor {
    pub fn new(index: SharedIndex) -> Self {
        Self { index }
    }

    /// Answers `req`. Never fails: every problem becomes an error response.
    pub async fn process(&self, req: &Request<Bytes>) -> Response<String> {
        let keep_alive = wants_keep_alive(req);

        let response = match self.suggest(req).await {
            Ok(result) => match result.to_json_body() {
                Ok(body) => respond(StatusCode::OK, JSON_CONTENT_TYPE, body),
                Err(e) => error_response(RequestError::Render(e)),
            },
            Err(e) => error_response(e),
        };

        tracing::debug!(
            "{} {} -> {}",
            req.method(),
            req.uri(),
            response.status().as_u16()
        );

        finish(response, req.version(), keep_alive)
    }

    /// Validates `req` and runs the lookup it asks for.
    pub async fn suggest(&self, req: &Request<Bytes>) -> Result<SuggestionResult, RequestError> {
        let query = extract_query(req)?;
        Ok(self.index.lookup(&query.input).await)
    }
}

/// Checks method and path, then pulls the `input` field out of the body.
pub fn extract_query(req: &Request<Bytes>) -> Result<SuggestRequest, RequestError> {
    if req.method() != Method::POST {
        return Err(RequestError::MethodNotAllowed);
    }

    let target = req.uri().path_and_query().map(|p| p.as_str());
    if target != Some(SUGGEST_PATH) {
        let target = target
            .map(str::to_string)
            .unwrap_or_else(|| req.uri().to_string());
        return Err(RequestError::NotFound(target));
    }

    let document: serde_json::Value =
        serde_json::from_slice(req.body()).map_err(RequestError::InvalidJson)?;

    serde_json::from_value(document).map_err(|_| RequestError::Usage)
}

/// HTTP/1.1 stays open unless told to close; HTTP/1.0 closes unless told
/// to stay open.
pub fn wants_keep_alive<B>(req: &Request<B>) -> bool {
    let connection = req
        .headers()
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .collect::<Vec<_>>();

    if connection.iter().any(|t| t == "close") {
        return false;
    }

    match req.version() {
        Version::HTTP_09 | Version::HTTP_10 => connection.iter().any(|t| t == "keep-alive"),
        _ => true,
    }
}

/// Error response for a request that never reached [`RequestProcessor::process`].
///
/// The connection is always closed afterwards.
pub fn error_reply(err: RequestError, version: Version) -> Response<String> {
    finish(error_response(err), version, false)
}

fn error_response(err: RequestError) -> Response<String> {
    if let RequestError::Render(e) = &err {
        tracing::error!("Failed to serialize suggestions: {}", e);
    }
    respond(err.status(), TEXT_CONTENT_TYPE, err.to_string())
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Stamps version and `Server`, plus a `Connection` header whenever the
/// decision differs from the default of `version`.
fn finish(mut response: Response<String>, version: Version, keep_alive: bool) -> Response<String> {
    *response.version_mut() = version;
    let headers = response.headers_mut();
    headers.insert(SERVER, HeaderValue::from_static(SERVER_NAME));

    let legacy = matches!(version, Version::HTTP_09 | Version::HTTP_10);
    match (legacy, keep_alive) {
        (true, true) => {
            headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        }
        (false, false) => {
            headers.insert(CONNECTION, HeaderValue::from_static("close"));
        }
        _ => {}
    }
    response
}
