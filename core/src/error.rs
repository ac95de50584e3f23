//! Error types for request construction and execution.
//!
//! # Design
//! Every internal step returns `Result<_, RequestError>`. The async client
//! never hands a `RequestError` to its caller; it converts it into an error
//! `Response` at the edge, so the variants double as the catalogue of failure
//! responses. `Display` is the exact message the caller sees.

use thiserror::Error;

use crate::http::TransportError;

/// Failure reported by an identity provider while fetching a token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct IdentityError(pub String);

impl IdentityError {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

/// Everything that can stop a request from producing a success response.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The endpoint is not an absolute, syntactically valid URL.
    #[error("Invalid URL")]
    InvalidUrl,

    /// The body could not be serialized to a JSON document.
    #[error("Failed to encode JSON")]
    EncodeJson(#[source] serde_json::Error),

    /// The body is not a flat JSON object of scalar values.
    #[error("Failed to encode form data")]
    EncodeForm(String),

    /// No identity session is active.
    #[error("Not signed in")]
    NotSignedIn,

    /// The identity provider failed to produce a token.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The identity provider succeeded but returned no token.
    #[error("Failed to get token")]
    MissingToken,

    /// The server answered with a status the transport rejected.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// No HTTP response was received.
    #[error("Request failed: {0}")]
    Transport(String),
}

impl RequestError {
    /// Build an `Http` error, using the body as the message when it has any.
    pub fn http(status: u16, body: &[u8]) -> Self {
        let message = if body.is_empty() {
            format!("Request failed with code: {status}")
        } else {
            String::from_utf8_lossy(body).into_owned()
        };
        RequestError::Http { status, message }
    }

    /// Status code carried into the error `Response`.
    pub fn code(&self) -> u16 {
        match self {
            RequestError::Http { status, .. } => *status,
            RequestError::NotSignedIn | RequestError::MissingToken => 401,
            RequestError::InvalidUrl
            | RequestError::EncodeJson(_)
            | RequestError::EncodeForm(_)
            | RequestError::Identity(_)
            | RequestError::Transport(_) => 0,
        }
    }
}

impl From<TransportError> for RequestError {
    fn from(err: TransportError) -> Self {
        match err.response {
            Some(response) => RequestError::http(response.status, &response.body),
            None => RequestError::Transport(err.message),
        }
    }
}
