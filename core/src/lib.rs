//! Client-side helper for authorized HTTP requests.
//!
//! # Overview
//! Shapes outbound requests (query string, `Authorization` header, JSON or
//! form body) and normalizes whatever happens next into a single `Response`.
//! Networking is delegated to a `Transport`, tokens to an
//! `IdentityProvider`.
//!
//! # Design
//! - `request` builds `HttpRequest` values and classifies outcomes without
//!   touching the network (host-does-IO), so the C ABI can reuse it.
//! - `Client` is the async surface; it is stateless apart from its transport
//!   and always completes with a `Response`, never an `Err`.
//! - The identity provider is passed explicitly to the authed calls.

pub mod auth;
pub mod client;
pub mod encoding;
pub mod error;
pub mod http;
pub mod identity;
pub mod request;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::Client;
pub use error::{IdentityError, RequestError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, TransportError};
pub use identity::{IdentityProvider, Session};
pub use request::{
    build_body_request, build_plain_request, build_url, parse_response, validate_endpoint,
};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{ContentType, QueryParams, Response, ResponseStatus};
