//! Integration tests for the fetcher
//!
//! These tests use wiremock to create mock HTTP servers and check the retry
//! loop against real HTTP responses.

use quill_search::config::Config;
use quill_search::crawler::{
    build_http_client, BaseRetryPolicy, ErrorKind, Fetcher, PageFetcher, RetryDecision,
};
use quill_search::FetchError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fetcher that retries `retries` times without pausing
fn create_test_fetcher(retries: u32) -> Fetcher {
    let mut config = Config::default();
    config.fetcher.timeout_ms = 1_000;
    let client = build_http_client(&config).expect("Failed to build client");
    Fetcher::new(client, BaseRetryPolicy::new(Duration::ZERO), retries)
}

async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

#[tokio::test]
async fn test_rate_limited_then_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>finally</p>"))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(5);
    let page = fetcher
        .get(&format!("{}/busy", mock_server.uri()))
        .await
        .expect("Fetch should succeed after retries");

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<p>finally</p>");
    assert_eq!(requests_to(&mock_server, "/busy").await, 4);
}

#[tokio::test]
async fn test_server_error_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(2);
    let url = format!("{}/down", mock_server.uri());
    let err = fetcher.get(&url).await.unwrap_err();

    match err {
        FetchError::RetriesExceeded {
            url: failed_url,
            attempts,
            last_status,
            ..
        } => {
            assert_eq!(failed_url, url);
            assert_eq!(attempts, 3);
            assert_eq!(last_status, Some(500));
        }
        other => panic!("Expected RetriesExceeded, got {:?}", other),
    }
    assert_eq!(requests_to(&mock_server, "/down").await, 3);
}

#[tokio::test]
async fn test_zero_retries_makes_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(0);
    let err = fetcher
        .get(&format!("{}/once", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(requests_to(&mock_server, "/once").await, 1);
}

#[tokio::test]
async fn test_not_found_is_returned_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(5);
    let page = fetcher
        .get(&format!("{}/missing", mock_server.uri()))
        .await
        .expect("404 is a response, not an error");

    assert_eq!(page.status, 404);
    assert_eq!(requests_to(&mock_server, "/missing").await, 1);
}

#[tokio::test]
async fn test_other_client_errors_are_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(5);
    let page = fetcher
        .get(&format!("{}/private", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(page.status, 403);
    assert!(matches!(
        page.error_for_status(),
        Err(FetchError::UnexpectedStatus { status: 403, .. })
    ));
    assert_eq!(requests_to(&mock_server, "/private").await, 1);
}

#[tokio::test]
async fn test_exist_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/here"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hi"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forbidden"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(1);
    let base = mock_server.uri();

    assert!(fetcher.exist_page(&format!("{}/here", base)).await);
    assert!(!fetcher.exist_page(&format!("{}/missing", base)).await);
    assert!(!fetcher.exist_page(&format!("{}/broken", base)).await);
    assert!(fetcher.exist_page(&format!("{}/forbidden", base)).await);
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.fetcher.timeout_ms = 100;
    let client = build_http_client(&config).unwrap();
    let fetcher = Fetcher::new(client, BaseRetryPolicy::new(Duration::from_millis(10)), 1);

    let err = fetcher
        .get(&format!("{}/slow", mock_server.uri()))
        .await
        .unwrap_err();

    match err {
        FetchError::RetriesExceeded {
            attempts,
            last_status,
            last_error,
            ..
        } => {
            assert_eq!(attempts, 2);
            assert_eq!(last_status, None);
            assert!(last_error.is_some());
        }
        other => panic!("Expected RetriesExceeded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirect_loop_is_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.fetcher.max_redirects = 3;
    let client = build_http_client(&config).unwrap();
    let fetcher = Fetcher::new(client, BaseRetryPolicy::new(Duration::ZERO), 5);

    let err = fetcher
        .get(&format!("{}/loop", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            FetchError::Transport {
                kind: ErrorKind::TooManyRedirects,
                ..
            }
        ),
        "unexpected error: {:?}",
        err
    );
    assert!(requests_to(&mock_server, "/loop").await <= 4);
}

#[tokio::test]
async fn test_custom_policy_closure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(418))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(200).set_body_string("coffee"))
        .mount(&mock_server)
        .await;

    let policy = |_: Option<ErrorKind>, status: Option<u16>| match status {
        Some(418) => RetryDecision::Retry {
            backoff: Duration::ZERO,
        },
        _ => RetryDecision::Terminal,
    };
    let client = build_http_client(&Config::default()).unwrap();
    let fetcher = Fetcher::new(client, policy, 3);

    let page = fetcher
        .get(&format!("{}/teapot", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(page.body, "coffee");
    assert_eq!(requests_to(&mock_server, "/teapot").await, 2);
}

#[tokio::test]
async fn test_response_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<p>hello</p>", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(0);
    let url = format!("{}/page", mock_server.uri());
    let page = fetcher.get(&url).await.unwrap();

    assert_eq!(page.url, url);
    assert_eq!(page.content_type.as_deref(), Some("text/html; charset=utf-8"));
}
