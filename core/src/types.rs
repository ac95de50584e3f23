//! Caller-facing value types.
//!
//! # Design
//! `Response` is the single result shape every client operation completes
//! with, success or not. It derives `Serialize` so hosts can forward it as
//! JSON; `data` is raw bytes and is left to the caller to decode.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Query-string parameters. Ordered so built URLs are deterministic.
pub type QueryParams = BTreeMap<String, String>;

/// Body encoding, which also decides the `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Json,
    Form,
}

impl ContentType {
    pub fn header_value(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
            ContentType::Form => "application/x-www-form-urlencoded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Normalized outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: ResponseStatus,
    /// HTTP status when one was received, otherwise 0.
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

impl Response {
    pub fn ok(code: u16, data: Vec<u8>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            code,
            message: "Request succeeded".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }

    /// The payload as text, replacing invalid UTF-8.
    pub fn text(&self) -> Option<String> {
        self.data
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Decode the payload as JSON. Returns `None` when there is no payload.
    pub fn json<T: DeserializeOwned>(&self) -> Option<serde_json::Result<T>> {
        self.data.as_deref().map(serde_json::from_slice)
    }
}

impl From<RequestError> for Response {
    fn from(err: RequestError) -> Self {
        Response::error(err.code(), err.to_string())
    }
}
