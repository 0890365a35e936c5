//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests driven by a pluggable retry policy
//! - Existence checks
//! - Markup filtering of fetched bodies

use crate::config::Config;
use crate::crawler::retry::{BaseRetryPolicy, ErrorKind, RetryDecision, RetryPolicy};
use crate::markup::{filter_html, FilterOption, Tag};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;

/// A fetched page body together with its response metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Page body
    pub body: String,
}

impl FetchedPage {
    /// Fails with [`FetchError::UnexpectedStatus`] for 4xx and 5xx responses
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.status >= 400 {
            return Err(FetchError::UnexpectedStatus {
                url: self.url,
                status: self.status,
            });
        }
        Ok(self)
    }
}

/// The capabilities the crawler needs from a fetcher
///
/// Implemented by [`Fetcher`] over HTTP; tests substitute in-memory fixtures.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, retrying according to the fetcher's policy
    ///
    /// A response whose status the policy treats as terminal (such as 404) is
    /// returned as `Ok`; only exhausted retries and terminal transport errors
    /// are `Err`.
    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Returns true unless the page answers 404 or cannot be fetched at all
    async fn exist_page(&self, url: &str) -> bool {
        match self.get(url).await {
            Ok(page) => page.status != StatusCode::NOT_FOUND.as_u16(),
            Err(e) => {
                tracing::warn!("Existence check failed for {}: {}", url, e);
                false
            }
        }
    }

    /// Runs the tag filter engine over a fetched body
    fn filter_page_elements(&self, body: &str, option: &FilterOption) -> Vec<Tag> {
        filter_html(body, option)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use quill_search::config::Config;
/// use quill_search::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(config.fetcher.timeout())
        .connect_timeout(config.fetcher.connect_timeout())
        .redirect(Policy::limited(config.fetcher.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP fetcher with retry classification
pub struct Fetcher {
    client: Client,
    policy: Box<dyn RetryPolicy>,
    retry_attempts: u32,
}

impl Fetcher {
    /// Creates a fetcher that makes at most `retry_attempts + 1` requests per call
    pub fn new(client: Client, policy: impl RetryPolicy + 'static, retry_attempts: u32) -> Self {
        Self {
            client,
            policy: Box::new(policy),
            retry_attempts,
        }
    }

    /// Creates a fetcher using the standard retry table and the configured client
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            client,
            BaseRetryPolicy::new(config.fetcher.backoff()),
            config.fetcher.retry_attempts,
        ))
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("retry_attempts", &self.retry_attempts)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageFetcher for Fetcher {
    /// # Retry Loop
    ///
    /// 1. Send the request
    /// 2. Ask the policy whether the outcome is terminal
    ///    - Terminal response → read the body and return it
    ///    - Terminal transport error → wrap it with the URL
    /// 3. Otherwise, if the budget is spent → `RetriesExceeded` with the last status/error
    /// 4. Sleep for the policy's backoff and go again
    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempts = 0u32;

        loop {
            attempts = attempts.saturating_add(1);
            tracing::debug!("GET {} (attempt {})", url, attempts);

            let (backoff, last_status, last_error) = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match self.policy.decide(None, Some(status)) {
                        RetryDecision::Terminal => return read_page(url, response).await,
                        RetryDecision::Retry { backoff } => (backoff, Some(status), None),
                    }
                }
                Err(source) => {
                    let kind = ErrorKind::classify(&source);
                    match self.policy.decide(Some(kind), None) {
                        RetryDecision::Terminal => {
                            return Err(FetchError::Transport {
                                url: url.to_string(),
                                kind,
                                source,
                            })
                        }
                        RetryDecision::Retry { backoff } => {
                            (backoff, None, Some(source.to_string()))
                        }
                    }
                }
            };

            if attempts > self.retry_attempts {
                return Err(FetchError::RetriesExceeded {
                    url: url.to_string(),
                    attempts,
                    last_status,
                    last_error,
                });
            }

            tracing::debug!(
                "Retrying {} in {:?} (status: {:?}, error: {:?})",
                url,
                backoff,
                last_status,
                last_error
            );
            pause(backoff).await;
        }
    }
}

async fn pause(backoff: Duration) {
    if !backoff.is_zero() {
        tokio::time::sleep(backoff).await;
    }
}

async fn read_page(url: &str, response: Response) -> Result<FetchedPage, FetchError> {
    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })?;

    Ok(FetchedPage {
        url: final_url,
        status,
        content_type,
        body,
    })
}
