//! End-to-end requests through `UreqTransport` against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in a background thread with its
//! own runtime, then drives the async client over real HTTP and checks what
//! the server saw (via `/echo`) and how each outcome was normalized.
//! Responses axum would not send (oversized or truncated bodies) come from a
//! one-shot raw TCP responder.

#![cfg(feature = "ureq")]

use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authfetch_core::{
    Client, ContentType, Credentials, HttpMethod, HttpRequest, IdentityError, IdentityProvider,
    QueryParams, Response, ResponseStatus, Session, Transport, UreqTransport,
};
use mock_server::{Echo, VALID_TOKEN};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Answer one connection with `head` followed by `body`, then hang up.
fn serve_once(head: String, body: Vec<u8>) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(head.as_bytes()).unwrap();
        // The client may hang up early on a short body.
        let _ = stream.write_all(&body);
    });

    format!("http://{addr}")
}

fn echo_of(response: &Response) -> Echo {
    assert!(response.is_ok(), "expected success, got {response:?}");
    response.json().unwrap().unwrap()
}

struct StaticToken(&'static str);

#[async_trait]
impl Session for StaticToken {
    async fn token(&self) -> Result<Option<String>, IdentityError> {
        Ok(Some(self.0.to_string()))
    }
}

struct SignedIn(Arc<dyn Session>);

impl IdentityProvider for SignedIn {
    fn current_session(&self) -> Option<Arc<dyn Session>> {
        Some(Arc::clone(&self.0))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn request_lifecycle() {
    let base = start_server();
    let client = Client::new(UreqTransport::new());

    // Step 1: plain GET with query params and basic auth.
    let mut query = QueryParams::new();
    query.insert("q".to_string(), "rust lang".to_string());
    query.insert("page".to_string(), "1".to_string());
    let response = client
        .plain_request(
            &format!("{base}/echo"),
            HttpMethod::Get,
            Some(&query),
            Some(&Credentials::basic("u", "p")),
        )
        .await;
    assert_eq!(response.code, 200);
    assert_eq!(response.message, "Request succeeded");
    let echo = echo_of(&response);
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.query, query);
    assert_eq!(echo.authorization.as_deref(), Some("Basic dTpw"));
    assert!(echo.content_type.is_none());

    // Step 2: JSON body with bearer auth.
    let response = client
        .body_request(
            &format!("{base}/echo"),
            &serde_json::json!({"text": "hi"}),
            ContentType::Json,
            HttpMethod::Post,
            None,
            Some(&Credentials::bearer("abc")),
        )
        .await;
    let echo = echo_of(&response);
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.authorization.as_deref(), Some("Bearer abc"));
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
    assert_eq!(echo.body, r#"{"text":"hi"}"#);

    // Step 3: form body.
    let response = client
        .body_request(
            &format!("{base}/echo"),
            &serde_json::json!({"a": "1", "b": "2"}),
            ContentType::Form,
            HttpMethod::Put,
            None,
            None,
        )
        .await;
    let echo = echo_of(&response);
    assert_eq!(echo.method, "PUT");
    assert_eq!(
        echo.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(echo.body, "a=1&b=2");

    // Step 4: error status with a body.
    let response = client
        .body_request(
            &format!("{base}/status/404"),
            &serde_json::json!({"reason": "gone"}),
            ContentType::Json,
            HttpMethod::Post,
            None,
            None,
        )
        .await;
    assert_eq!(response, Response::error(404, r#"{"reason":"gone"}"#));

    // Step 5: error status without a body.
    let response = client
        .plain_request(&format!("{base}/status/503"), HttpMethod::Get, None, None)
        .await;
    assert_eq!(response, Response::error(503, "Request failed with code: 503"));

    // Step 6: authed request against the guarded route.
    let identity = SignedIn(Arc::new(StaticToken(VALID_TOKEN)));
    let response = client
        .authed_plain_request(&identity, &format!("{base}/protected"), HttpMethod::Get, None)
        .await;
    assert!(response.is_ok());
    assert_eq!(response.text().as_deref(), Some("secret"));

    // Step 7: a token the server rejects.
    let identity = SignedIn(Arc::new(StaticToken("stale")));
    let response = client
        .authed_plain_request(&identity, &format!("{base}/protected"), HttpMethod::Get, None)
        .await;
    assert_eq!(response, Response::error(401, "unauthorized"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_host_is_a_transport_failure() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = Client::new(UreqTransport::new());

    let response = client
        .plain_request(&format!("http://{addr}/echo"), HttpMethod::Get, None, None)
        .await;
    assert!(!response.is_ok());
    assert_eq!(response.code, 0);
    assert!(
        response.message.starts_with("Request failed: "),
        "unexpected message: {}",
        response.message
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn body_larger_than_ten_mib_is_delivered() {
    let body = vec![b'x'; 11 * 1024 * 1024];
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let base = serve_once(head, body);
    let client = Client::with_ureq();

    let response = client
        .plain_request(&format!("{base}/large"), HttpMethod::Get, None, None)
        .await;
    assert!(response.is_ok(), "unexpected outcome: {}", response.message);
    assert_eq!(response.code, 200);
    assert_eq!(response.data.as_ref().map(Vec::len), Some(11 * 1024 * 1024));
}

#[tokio::test(flavor = "multi_thread")]
async fn truncated_body_keeps_the_status_code() {
    let head = "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n".to_string();
    let base = serve_once(head, b"only ten b".to_vec());
    let client = Client::with_ureq();

    let response = client
        .plain_request(&format!("{base}/short"), HttpMethod::Get, None, None)
        .await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert_eq!(response.code, 200);
}

#[tokio::test(flavor = "multi_thread")]
async fn custom_agent_reports_response_headers() {
    let base = start_server();
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(Duration::from_secs(10)))
        .build()
        .new_agent();
    let client = Client::new(UreqTransport::with_agent(agent));

    let response = client
        .transport()
        .execute(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{base}/echo"),
            headers: Vec::new(),
            body: None,
        })
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    let content_type = response
        .headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.as_str());
    assert_eq!(content_type, Some("application/json"));

    let error = client
        .transport()
        .execute(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{base}/status/418"),
            headers: Vec::new(),
            body: None,
        })
        .await
        .unwrap_err();
    assert_eq!(error.response.map(|r| r.status), Some(418));
}
