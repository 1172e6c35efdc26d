//! Integration tests for the relay: key handling, parameter forwarding,
//! verbatim pass-through, body size cap and CORS.
//!
//! Each test binds its own relay on an ephemeral port in front of a
//! wiremock upstream.

use newsdesk::proxy::{self, ProxyState, NEWS_ROUTE};
use newsdesk::util::MAX_BODY_SIZE;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "test-key-123";

/// Start a relay in front of `upstream` and return its news endpoint URL.
async fn start_relay(upstream: &str, key: Option<&str>) -> String {
    let state = ProxyState::new(upstream, key.map(|k| SecretString::from(k.to_string()))).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(proxy::serve(
        listener,
        Arc::new(state),
        std::future::pending::<()>(),
    ));
    format!("http://{}{}", addr, NEWS_ROUTE)
}

fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
}

async fn json_body(response: reqwest::Response) -> serde_json::Value {
    let text = response.text().await.unwrap();
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn test_missing_key_returns_500_without_calling_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let url = start_relay(&upstream.uri(), None).await;
    let response = reqwest::get(format!("{}?category=science", url))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    assert_cors(&response);
    let body = json_body(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("API key is not configured"));
}

#[tokio::test]
async fn test_forwards_defaults_and_key() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(header("X-Api-Key", TEST_KEY))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "20"))
        .and(query_param("country", "us"))
        .and(query_param_is_missing("category"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":"ok","totalResults":0,"articles":[]}"#,
        ))
        .expect(1)
        .mount(&upstream)
        .await;

    let url = start_relay(&upstream.uri(), Some(TEST_KEY)).await;
    let response = reqwest::get(url).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_cors(&response);
    assert_eq!(response.headers()["content-type"], "application/json");
}

#[tokio::test]
async fn test_all_category_is_not_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param_is_missing("category"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&upstream)
        .await;

    let url = start_relay(&upstream.uri(), Some(TEST_KEY)).await;
    let response = reqwest::get(format!("{}?category=all&page=3", url))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_forwards_category_and_query() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("category", "technology"))
        .and(query_param("q", "rust lang"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&upstream)
        .await;

    let url = start_relay(&upstream.uri(), Some(TEST_KEY)).await;
    let response = reqwest::get(format!(
        "{}?category=technology&q=rust%20lang&pageSize=10",
        url
    ))
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn test_upstream_status_and_body_are_relayed_verbatim() {
    let upstream = MockServer::start().await;
    let raw = r#"{"status":"error","code":"rateLimited","message":"Too many requests"}"#;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string(raw))
        .mount(&upstream)
        .await;

    let url = start_relay(&upstream.uri(), Some(TEST_KEY)).await;
    let response = reqwest::get(url).await.unwrap();

    assert_eq!(response.status().as_u16(), 429);
    assert_cors(&response);
    assert_eq!(response.text().await.unwrap(), raw);
}

#[tokio::test]
async fn test_options_preflight_is_empty_200() {
    let upstream = MockServer::start().await;
    let url = start_relay(&upstream.uri(), None).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, url)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_cors(&response);
    assert_eq!(response.text().await.unwrap(), "");
}

#[tokio::test]
async fn test_other_methods_rejected_with_cors() {
    let upstream = MockServer::start().await;
    let url = start_relay(&upstream.uri(), Some(TEST_KEY)).await;

    let response = reqwest::Client::new().post(url).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 405);
    assert_cors(&response);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_unreachable_upstream_returns_500_with_message() {
    // Bind then drop to get a port with nothing listening
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", closed.local_addr().unwrap());
    drop(closed);

    let url = start_relay(&dead, Some(TEST_KEY)).await;
    let response = reqwest::get(url).await.unwrap();

    assert_eq!(response.status().as_u16(), 500);
    assert_cors(&response);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_key_never_echoed_in_responses() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#,
        ))
        .mount(&upstream)
        .await;

    let url = start_relay(&upstream.uri(), Some(TEST_KEY)).await;
    let response = reqwest::get(url).await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
    let text = response.text().await.unwrap();
    assert!(!text.contains(TEST_KEY));
}

#[tokio::test]
async fn test_health_endpoint() {
    let upstream = MockServer::start().await;
    let url = start_relay(&upstream.uri(), None).await;
    let health = url.replace(NEWS_ROUTE, "/health");

    let response = reqwest::get(health).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_cors(&response);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_oversized_upstream_body_returns_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(MAX_BODY_SIZE + 1)))
        .mount(&upstream)
        .await;

    let url = start_relay(&upstream.uri(), Some(TEST_KEY)).await;
    let response = reqwest::get(url).await.unwrap();

    assert_eq!(response.status().as_u16(), 500);
    assert_cors(&response);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].as_str().unwrap().contains("too large"));
}

#[tokio::test]
async fn test_non_json_upstream_body_passes_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&upstream)
        .await;

    let url = start_relay(&upstream.uri(), Some(TEST_KEY)).await;
    let response = reqwest::get(url).await.unwrap();

    assert_eq!(response.status().as_u16(), 502);
    assert_eq!(response.text().await.unwrap(), "<html>Bad Gateway</html>");
}
