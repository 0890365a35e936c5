//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full scrape-and-rank cycle end-to-end.

use quill_search::config::Config;
use quill_search::crawler::{crawl, Crawler};
use quill_search::lexer::Lexer;
use quill_search::ranker::{Model, Path};
use quill_search::{CrawlError, FetchError, SearchError};
use std::collections::HashMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that retries once without pausing
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.fetcher.timeout_ms = 2_000;
    config.fetcher.retry_attempts = 1;
    config.fetcher.backoff_ms = 0;
    config.crawler.max_concurrent_fetches = 4;
    config
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

/// Mounts a seed linking to two good pages, a broken one and a missing one
async fn mount_site(server: &MockServer) {
    let base_url = server.uri();

    mount_page(
        server,
        "/",
        200,
        &format!(
            r#"<html><head><title>Home</title><style>body {{ color: red; }}</style></head><body>
            <h1>Welcome</h1>
            <a href="/page1">First</a>
            <a href="{}/page2#top">Second</a>
            <a href="/page1">First again</a>
            <a href="/broken">Broken</a>
            <a href="/missing">Missing</a>
            <a href="mailto:owner@example.com">Mail</a>
            <script>var tracker = 1;</script>
            </body></html>"#,
            base_url
        ),
    )
    .await;

    mount_page(
        server,
        "/page1",
        200,
        r#"<html><head><title>Crawling</title></head><body>
        <p>Rust crawlers fetch pages concurrently.</p><img src="crab.png">
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/page2",
        200,
        r#"<html><body><p>Ferris the crab</p><noscript>Enable JavaScript</noscript></body></html>"#,
    )
    .await;

    mount_page(server, "/broken", 500, "Internal Server Error").await;
    mount_page(server, "/missing", 404, "Not Found").await;
}

#[tokio::test]
async fn test_full_scrape() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();
    let seed = format!("{}/", base_url);

    let crawler = Crawler::from_config(&create_test_config()).expect("Failed to build crawler");
    let pages = crawler.scrape(&seed).await.expect("Scrape should succeed");

    let mut urls: Vec<&str> = pages.keys().map(String::as_str).collect();
    urls.sort();
    let page1 = format!("{}/page1", base_url);
    let page2 = format!("{}/page2", base_url);
    assert_eq!(urls, vec![seed.as_str(), page1.as_str(), page2.as_str()]);

    assert_eq!(
        pages[&seed],
        vec!["Home", "Welcome", "First", "Second", "First again", "Broken", "Missing", "Mail"]
    );
    assert_eq!(
        pages[&page1],
        vec!["Crawling", "Rust crawlers fetch pages concurrently."]
    );
    assert_eq!(pages[&page2], vec!["Ferris the crab"]);
}

#[tokio::test]
async fn test_seed_is_fetched_once_after_existence_check() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let crawler = Crawler::from_config(&create_test_config()).unwrap();
    crawler
        .scrape(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let mut per_path: HashMap<String, usize> = HashMap::new();
    for request in &requests {
        *per_path.entry(request.url.path().to_string()).or_default() += 1;
    }

    assert_eq!(per_path["/"], 2);
    assert_eq!(per_path["/page1"], 2);
    assert_eq!(per_path["/page2"], 2);
    // Existence check only: two attempts, then the link is given up
    assert_eq!(per_path["/broken"], 2);
    assert_eq!(per_path["/missing"], 1);
}

#[tokio::test]
async fn test_seed_not_found() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 404, "Not Found").await;
    let seed = format!("{}/", mock_server.uri());

    let crawler = Crawler::from_config(&create_test_config()).unwrap();
    let err = crawler.scrape(&seed).await.unwrap_err();

    match err {
        CrawlError::PageNotFound { url } => assert_eq!(url, seed),
        other => panic!("Expected PageNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_seed_unavailable() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 503, "Service Unavailable").await;

    let crawler = Crawler::from_config(&create_test_config()).unwrap();
    let err = crawler
        .scrape(&format!("{}/", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::PageNotFound { .. }));
}

#[tokio::test]
async fn test_seed_forbidden() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 403, "Forbidden").await;

    let crawler = Crawler::from_config(&create_test_config()).unwrap();
    let err = crawler
        .scrape(&format!("{}/", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CrawlError::Fetch(FetchError::UnexpectedStatus { status: 403, .. })
    ));
}

#[tokio::test]
async fn test_malformed_seed() {
    let crawler = Crawler::from_config(&create_test_config()).unwrap();

    for seed in ["not a url", "ftp://example.com/", "htp:/broken"] {
        let err = crawler.scrape(seed).await.unwrap_err();
        assert!(
            matches!(&err, CrawlError::MalformedUrl { url, .. } if url == seed),
            "unexpected error for {}: {:?}",
            seed,
            err
        );
    }
}

#[tokio::test]
async fn test_crawl_entry_point() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;

    let pages = crawl(&create_test_config(), &format!("{}/", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(pages.len(), 3);

    let err = crawl(&create_test_config(), "not a url").await.unwrap_err();
    assert!(matches!(
        err,
        SearchError::Crawl(CrawlError::MalformedUrl { .. })
    ));
}

#[tokio::test]
async fn test_scrape_and_rank() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let base_url = mock_server.uri();

    let crawler = Crawler::from_config(&create_test_config()).unwrap();
    let pages = crawler.scrape(&format!("{}/", base_url)).await.unwrap();

    let mut model = Model::default();
    for (url, content) in pages {
        model.add_documents([(url, Lexer::new(content))]);
    }
    assert_eq!(model.len(), 3);

    assert_eq!(
        model.rank(&["ferris"]),
        vec![Path::from(format!("{}/page2", base_url))]
    );
    assert_eq!(
        model.rank(&["rust", "crawlers"]),
        vec![Path::from(format!("{}/page1", base_url))]
    );
    assert_eq!(
        model.rank(&["welcome"]),
        vec![Path::from(format!("{}/", base_url))]
    );
    assert!(model.rank(&["javascript"]).is_empty());
    assert!(model.rank(&["tracker"]).is_empty());
}
