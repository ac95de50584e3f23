//! Async client over a `Transport`.
//!
//! # Design
//! `Client` holds only its transport and carries no state between calls.
//! Every method resolves to exactly one `Response`: build failures,
//! identity failures and transport failures are all folded into error
//! responses instead of being returned as `Err`.

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::Credentials;
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest};
use crate::identity::{fetch_token, IdentityProvider};
use crate::request::{build_body_request, build_plain_request, build_url, parse_response};
use crate::transport::Transport;
use crate::types::{ContentType, QueryParams, Response};

#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
}

#[cfg(feature = "ureq")]
impl Client<crate::transport::UreqTransport> {
    /// Client backed by a default `UreqTransport`.
    pub fn with_ureq() -> Self {
        Self::new(crate::transport::UreqTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request without a body.
    pub async fn plain_request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        query: Option<&QueryParams>,
        credentials: Option<&Credentials>,
    ) -> Response {
        match build_plain_request(endpoint, method, query, credentials) {
            Ok(request) => self.send(request).await,
            Err(err) => rejected(endpoint, method, err),
        }
    }

    /// Send `body` encoded as `content_type`.
    pub async fn body_request<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        content_type: ContentType,
        method: HttpMethod,
        query: Option<&QueryParams>,
        credentials: Option<&Credentials>,
    ) -> Response {
        match build_body_request(endpoint, body, content_type, method, query, credentials) {
            Ok(request) => self.send(request).await,
            Err(err) => rejected(endpoint, method, err),
        }
    }

    /// Like `plain_request`, authorized with a fresh token from `identity`.
    pub async fn authed_plain_request(
        &self,
        identity: &dyn IdentityProvider,
        endpoint: &str,
        method: HttpMethod,
        query: Option<&QueryParams>,
    ) -> Response {
        let token = match fetch_token(identity).await {
            Ok(token) => token,
            Err(err) => return rejected(endpoint, method, err),
        };
        let url = build_url(endpoint, query);
        self.plain_request(&url, method, None, Some(&Credentials::bearer(token)))
            .await
    }

    /// Like `body_request`, authorized with a fresh token from `identity`.
    pub async fn authed_body_request<B: Serialize + ?Sized>(
        &self,
        identity: &dyn IdentityProvider,
        endpoint: &str,
        method: HttpMethod,
        body: &B,
        content_type: ContentType,
    ) -> Response {
        let token = match fetch_token(identity).await {
            Ok(token) => token,
            Err(err) => return rejected(endpoint, method, err),
        };
        self.body_request(
            endpoint,
            body,
            content_type,
            method,
            None,
            Some(&Credentials::bearer(token)),
        )
        .await
    }

    async fn send(&self, request: HttpRequest) -> Response {
        let request_id = Uuid::new_v4();
        let method = request.method;
        debug!(%request_id, %method, url = %request.url, "sending request");

        let response = parse_response(self.transport.execute(request).await);
        if response.is_ok() {
            debug!(%request_id, code = response.code, "request succeeded");
        } else {
            warn!(%request_id, code = response.code, message = %response.message, "request failed");
        }
        response
    }
}

fn rejected(endpoint: &str, method: HttpMethod, err: RequestError) -> Response {
    warn!(%endpoint, %method, error = %err, "request not sent");
    err.into()
}
