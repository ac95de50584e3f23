//! Transport seam and the bundled `ureq` implementation.
//!
//! # Design
//! A `Transport` executes one `HttpRequest` and decides what counts as
//! success. `UreqTransport` accepts 2xx only; any other status comes back as
//! a `TransportError` that still carries the response, so the caller can
//! report the server's own message.

use async_trait::async_trait;

use crate::http::{HttpRequest, HttpResponse, TransportError};

/// Executes HTTP requests on behalf of the client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use async_trait::async_trait;
    use ureq::Agent;

    use super::Transport;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportError};

    /// `ureq` agent driven from `tokio::task::spawn_blocking`.
    ///
    /// Must be used from within a Tokio runtime.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }

        /// Use a caller-configured agent. It should have
        /// `http_status_as_error(false)` so error bodies reach the caller.
        pub fn with_agent(agent: Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Transport for UreqTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let agent = self.agent.clone();
            tokio::task::spawn_blocking(move || execute_blocking(&agent, request))
                .await
                .map_err(|e| TransportError::connection(e.to_string()))?
        }
    }

    fn execute_blocking(
        agent: &Agent,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                let mut builder = match method {
                    HttpMethod::Post => agent.post(&url),
                    HttpMethod::Put => agent.put(&url),
                    _ => agent.patch(&url),
                };
                for (key, value) in &headers {
                    builder = builder.header(key, value);
                }
                match body {
                    Some(body) => builder.send(&body[..]),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Get | HttpMethod::Delete | HttpMethod::Head => {
                let mut builder = match method {
                    HttpMethod::Get => agent.get(&url),
                    HttpMethod::Delete => agent.delete(&url),
                    _ => agent.head(&url),
                };
                for (key, value) in &headers {
                    builder = builder.header(key, value);
                }
                match body {
                    Some(body) => builder.force_send_body().send(&body[..]),
                    None => builder.call(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError::connection(e.to_string()))?;
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // The status line has arrived, so a failed body read still reports it.
        let body = if method == HttpMethod::Head {
            Vec::new()
        } else {
            match response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_vec()
            {
                Ok(body) => body,
                Err(e) => {
                    return Err(TransportError {
                        message: e.to_string(),
                        response: Some(HttpResponse {
                            status,
                            headers,
                            body: Vec::new(),
                        }),
                    });
                }
            }
        };

        let response = HttpResponse {
            status,
            headers,
            body,
        };
        if (200..300).contains(&status) {
            Ok(response)
        } else {
            Err(TransportError::status(response))
        }
    }
}
