use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, VALID_TOKEN};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn empty(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reports_method_and_query() {
    let resp = app()
        .oneshot(empty("DELETE", "/echo?id=7&name=a%20b"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "DELETE");
    assert_eq!(echo.query.get("id").map(String::as_str), Some("7"));
    assert_eq!(echo.query.get("name").map(String::as_str), Some("a b"));
    assert!(echo.authorization.is_none());
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn echo_reports_headers_and_body() {
    let req = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(http::header::AUTHORIZATION, "Basic dTpw")
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("a=1&b=2".to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.authorization.as_deref(), Some("Basic dTpw"));
    assert_eq!(
        echo.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(echo.body, "a=1&b=2");
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code_and_body() {
    let req = Request::builder()
        .method("POST")
        .uri("/status/404")
        .body("not found".to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"not found");
}

#[tokio::test]
async fn status_with_empty_body() {
    let resp = app().oneshot(empty("GET", "/status/500")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn status_rejects_out_of_range_code() {
    let resp = app().oneshot(empty("GET", "/status/42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- protected ---

#[tokio::test]
async fn protected_accepts_valid_token() {
    let req = Request::builder()
        .uri("/protected")
        .header(http::header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"secret");
}

#[tokio::test]
async fn protected_rejects_missing_token() {
    let resp = app().oneshot(empty("GET", "/protected")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(&body_bytes(resp).await[..], b"unauthorized");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app().oneshot(empty("GET", "/nowhere")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
