//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Retry classification
//! - HTTP fetching driven by a retry policy
//! - Text and link extraction
//! - Concurrent crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod retry;

pub use coordinator::{Crawler, Page, DEFAULT_MAX_CONCURRENT_FETCHES};
pub use fetcher::{build_http_client, FetchedPage, Fetcher, PageFetcher};
pub use parser::{extract_links, page_content};
pub use retry::{BaseRetryPolicy, ErrorKind, RetryDecision, RetryPolicy, DEFAULT_BACKOFF};

use crate::config::Config;
use crate::SearchError;
use std::collections::HashMap;

/// Scrapes `seed` and its direct links with an HTTP crawler built from `config`
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client and retry policy
/// 2. Check and fetch the seed
/// 3. Fetch every page the seed links to
///
/// # Example
///
/// ```no_run
/// use quill_search::config::Config;
/// use quill_search::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pages = crawl(&Config::default(), "https://example.com/").await?;
/// for (url, content) in &pages {
///     println!("{}: {} fragments", url, content.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: &Config,
    seed: &str,
) -> Result<HashMap<String, Vec<String>>, SearchError> {
    let crawler = Crawler::from_config(config)?;
    Ok(crawler.scrape(seed).await?)
}
