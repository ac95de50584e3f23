//! Stateless request building and response classification.
//!
//! # Design
//! Each operation is split into a `build_*` function that produces an
//! `HttpRequest` and `parse_response`, which turns whatever the transport
//! reported into a `Response`. Nothing here performs I/O, so the async client
//! and the C ABI share the same logic.

use serde::Serialize;
use url::Url;

use crate::auth::Credentials;
use crate::encoding::encode_body;
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportError};
use crate::types::{ContentType, QueryParams, Response};

/// Merge `query` into `endpoint`, replacing any existing query string.
///
/// An endpoint that does not parse is returned unchanged; the failure
/// surfaces later when the request is validated or sent.
pub fn build_url(endpoint: &str, query: Option<&QueryParams>) -> String {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return endpoint.to_string();
    };
    let Ok(mut url) = Url::parse(endpoint) else {
        return endpoint.to_string();
    };
    url.query_pairs_mut().clear().extend_pairs(query);
    url.to_string()
}

/// Build a request without a body.
pub fn build_plain_request(
    endpoint: &str,
    method: HttpMethod,
    query: Option<&QueryParams>,
    credentials: Option<&Credentials>,
) -> Result<HttpRequest, RequestError> {
    validate_endpoint(endpoint)?;
    Ok(HttpRequest {
        method,
        url: build_url(endpoint, query),
        headers: auth_headers(credentials),
        body: None,
    })
}

/// Build a request carrying `body` encoded as `content_type`.
pub fn build_body_request<B: Serialize + ?Sized>(
    endpoint: &str,
    body: &B,
    content_type: ContentType,
    method: HttpMethod,
    query: Option<&QueryParams>,
    credentials: Option<&Credentials>,
) -> Result<HttpRequest, RequestError> {
    validate_endpoint(endpoint)?;
    let payload = encode_body(body, content_type)?;
    let mut headers = auth_headers(credentials);
    headers.push((
        "Content-Type".to_string(),
        content_type.header_value().to_string(),
    ));
    Ok(HttpRequest {
        method,
        url: build_url(endpoint, query),
        headers,
        body: Some(payload),
    })
}

/// Classify a transport outcome.
pub fn parse_response(outcome: Result<HttpResponse, TransportError>) -> Response {
    match outcome {
        Ok(response) => Response::ok(response.status, response.body),
        Err(err) => RequestError::from(err).into(),
    }
}

/// Check that `endpoint` is an absolute, syntactically valid URL.
pub fn validate_endpoint(endpoint: &str) -> Result<(), RequestError> {
    Url::parse(endpoint)
        .map(|_| ())
        .map_err(|_| RequestError::InvalidUrl)
}

fn auth_headers(credentials: Option<&Credentials>) -> Vec<(String, String)> {
    credentials
        .and_then(Credentials::authorization)
        .map(|value| ("Authorization".to_string(), value))
        .into_iter()
        .collect()
}
