use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Token accepted by `/protected`.
pub const VALID_TOKEN: &str = "valid-token";

/// What `/echo` saw, returned as JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub query: BTreeMap<String, String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/protected", get(protected))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    tracing::debug!(%method, "echo");
    Json(Echo {
        method: method.to_string(),
        query,
        authorization: header_text(&headers, header::AUTHORIZATION),
        content_type: header_text(&headers, header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Respond with the status in the path and the request body as the response
/// body.
async fn status(Path(code): Path<u16>, body: Bytes) -> Result<(StatusCode, Bytes), StatusCode> {
    let code = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((code, body))
}

async fn protected(headers: HeaderMap) -> (StatusCode, &'static str) {
    let expected = format!("Bearer {VALID_TOKEN}");
    match header_text(&headers, header::AUTHORIZATION) {
        Some(value) if value == expected => (StatusCode::OK, "secret"),
        _ => (StatusCode::UNAUTHORIZED, "unauthorized"),
    }
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
