//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use crate::types::BackoffType;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build();
    HttpClient::with_config(config).unwrap()
}

fn backoff_client(backoff_type: BackoffType, initial_ms: u64, max_ms: u64) -> HttpClient {
    let config = HttpClientConfig::builder()
        .backoff(
            backoff_type,
            Duration::from_millis(initial_ms),
            Duration::from_millis(max_ms),
        )
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(15));
    assert_eq!(config.max_retries, 2);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("strategy-feed/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://quant.example.com")
        .timeout(Duration::from_secs(5))
        .max_retries(4)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(50),
            Duration::from_secs(2),
        )
        .rate_limit(RateLimiterConfig::new(3, 6))
        .header("Authorization", "Bearer t0ken")
        .user_agent("dashboard/2.1")
        .build();

    assert_eq!(config.base_url.as_deref(), Some("https://quant.example.com"));
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 4);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(3, 6)));
    assert_eq!(
        config.default_headers.get("Authorization"),
        Some(&"Bearer t0ken".to_string())
    );
    assert_eq!(config.user_agent, "dashboard/2.1");
}

#[test]
fn test_request_config_keeps_query_order() {
    let config = RequestConfig::new()
        .query("page", "1")
        .query("pageSize", "20")
        .header("X-Request-Id", "abc123")
        .timeout(Duration::from_secs(3))
        .retries(0);

    assert_eq!(
        config.query,
        vec![
            ("page".to_string(), "1".to_string()),
            ("pageSize".to_string(), "20".to_string())
        ]
    );
    assert_eq!(config.headers.get("X-Request-Id"), Some(&"abc123".to_string()));
    assert_eq!(config.timeout, Some(Duration::from_secs(3)));
    assert_eq!(config.max_retries, Some(0));
}

#[tokio::test]
async fn test_get_json_with_query_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .and(query_param("search", "grid"))
        .and(query_param("page", "2"))
        .and(header("X-Client", "feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [], "total": 0
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body: serde_json::Value = client
        .get_json_with_config(
            "/api/strategies",
            RequestConfig::new()
                .query("search", "grid")
                .query("page", "2")
                .header("X-Client", "feed"),
        )
        .await
        .unwrap();

    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(format!("{}/", server.uri()))
        .header("Authorization", "Bearer abc")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client.get("api/strategies").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result: crate::error::Result<serde_json::Value> = client
        .get_json_with_config("/api/strategies", RequestConfig::new())
        .await;
    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get("/api/strategies").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, ref body } if body == "Not found"));
}

#[tokio::test]
async fn test_retry_on_500_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.get("/api/strategies").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_rate_limited_response_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.get("/api/strategies").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_retries_exhausted_returns_last_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get("/api/strategies").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_timeout_surfaces_as_timeout_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .get_with_config(
            "/api/strategies",
            RequestConfig::new()
                .timeout(Duration::from_millis(50))
                .retries(0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
}

#[tokio::test]
async fn test_rate_limited_client_still_serves_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/strategies"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());

    for _ in 0..3 {
        client.get("/api/strategies").await.unwrap();
    }
}

#[test]
fn test_calculate_backoff_constant() {
    let client = backoff_client(BackoffType::Constant, 100, 10_000);
    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(5), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_linear() {
    let client = backoff_client(BackoffType::Linear, 100, 10_000);
    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_calculate_backoff_linear_saturates() {
    let client = backoff_client(BackoffType::Linear, u64::MAX, 10_000);
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(10_000));

    let client = backoff_client(BackoffType::Linear, 100, 10_000);
    assert_eq!(client.calculate_backoff(u32::MAX), Duration::from_millis(10_000));
}

#[test]
fn test_calculate_backoff_exponential_capped() {
    let client = backoff_client(BackoffType::Exponential, 100, 500);
    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(40), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::new().unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("has_rate_limiter: false"));
}
