//! Crawler coordinator - seed scraping and link fan-out
//!
//! A crawl is one level deep: the seed page plus every page it links to.
//! This module contains:
//! - Seed validation and the existence check
//! - Content and link extraction for the seed
//! - Bounded concurrent fetching of the discovered links
//! - Aggregation of the results into one URL to content mapping

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, PageFetcher};
use crate::crawler::parser::{extract_links, page_content};
use crate::markup::FilterOption;
use crate::url::parse_seed;
use crate::CrawlError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use url::Url;

/// Default bound on link fetches in flight at once
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 16;

/// Text content collected from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    /// Text fragments in document order
    pub content: Vec<String>,
}

/// What a link task reports back to the aggregator
#[derive(Debug)]
enum LinkOutcome {
    Page(Page),
    Failed { url: String, error: CrawlError },
}

/// Scrapes a seed page and the pages it links to
pub struct Crawler<F = Fetcher> {
    fetcher: Arc<F>,
    content_filter: FilterOption,
    max_concurrent: usize,
    crawl_timeout: Option<Duration>,
}

impl Crawler<Fetcher> {
    /// Creates a crawler backed by an HTTP [`Fetcher`] built from `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = Fetcher::from_config(config)?;
        Ok(Self::new(fetcher)
            .with_content_filter(FilterOption::exclude(&config.crawler.exclude_tags))
            .with_max_concurrent(config.crawler.max_concurrent_fetches)
            .with_crawl_timeout(config.crawler.crawl_timeout()))
    }
}

impl<F: PageFetcher + 'static> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            content_filter: FilterOption::content_default(),
            max_concurrent: DEFAULT_MAX_CONCURRENT_FETCHES,
            crawl_timeout: None,
        }
    }

    /// Sets the filter used to collect page text
    pub fn with_content_filter(mut self, filter: FilterOption) -> Self {
        self.content_filter = filter;
        self
    }

    /// Bounds the number of link fetches in flight; zero is treated as one
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Sets an overall deadline for the link fan-out
    pub fn with_crawl_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.crawl_timeout = timeout;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Scrapes `seed` and every page it links to
    ///
    /// # Crawl Steps
    ///
    /// 1. Parse the seed; a malformed seed fails with [`CrawlError::MalformedUrl`]
    /// 2. Check that the seed exists; otherwise fail with [`CrawlError::PageNotFound`]
    /// 3. Fetch the seed once and filter it twice: text content and anchors
    /// 4. Fetch every discovered link concurrently, at most `max_concurrent` at a time
    /// 5. Collect each link's content as it arrives; failed links are logged and left out
    ///
    /// When a crawl deadline is set and expires, the remaining link fetches are
    /// cancelled and the pages collected so far are returned.
    ///
    /// The seed is keyed by `seed` exactly as given; links are keyed as
    /// normalized by [`crate::url::normalize_link`]. A link to the seed itself,
    /// in any spelling that parses to the same URL, is not fetched again.
    pub async fn scrape(&self, seed: &str) -> Result<HashMap<String, Vec<String>>, CrawlError> {
        let seed_url = parse_seed(seed).map_err(|source| CrawlError::MalformedUrl {
            url: seed.to_string(),
            source,
        })?;
        if !self.fetcher.exist_page(seed_url.as_str()).await {
            return Err(CrawlError::PageNotFound {
                url: seed.to_string(),
            });
        }

        let page = self.fetcher.get(seed_url.as_str()).await?.error_for_status()?;
        let content = page_content(
            &self
                .fetcher
                .filter_page_elements(&page.body, &self.content_filter),
        );
        let links: Vec<String> = extract_links(
            &self
                .fetcher
                .filter_page_elements(&page.body, &FilterOption::links()),
            &seed_url,
        )
        .into_iter()
        .filter(|link| !is_same_page(link, &seed_url))
        .collect();

        tracing::info!("Seed {} has {} outbound links", seed, links.len());

        let mut pages = HashMap::with_capacity(links.len() + 1);
        pages.insert(seed.to_string(), content);

        if links.is_empty() {
            return Ok(pages);
        }

        let (tx, mut rx) = mpsc::channel::<LinkOutcome>(self.max_concurrent);
        let permits = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for link in links {
            let tx = tx.clone();
            let permits = Arc::clone(&permits);
            let fetcher = Arc::clone(&self.fetcher);
            let filter = self.content_filter.clone();

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let outcome = match pull_content(fetcher.as_ref(), &link, &filter).await {
                    Ok(content) => LinkOutcome::Page(Page { url: link, content }),
                    Err(error) => LinkOutcome::Failed { url: link, error },
                };
                // The receiver only goes away once the crawl is over
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        // The channel closes once every task has reported or been aborted
        let aggregate = async {
            while let Some(outcome) = rx.recv().await {
                record(&mut pages, outcome);
            }
        };

        match self.crawl_timeout {
            Some(deadline) => {
                if tokio::time::timeout(deadline, aggregate).await.is_err() {
                    tracing::warn!(
                        "Crawl deadline of {:?} reached, cancelling {} link fetches",
                        deadline,
                        tasks.len()
                    );
                    tasks.abort_all();
                }
            }
            None => aggregate.await,
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    tracing::warn!("Link task panicked: {}", e);
                }
            }
        }

        // Outcomes sent between the deadline and the abort
        while let Ok(outcome) = rx.try_recv() {
            record(&mut pages, outcome);
        }

        tracing::info!("Crawl finished with {} pages", pages.len());
        Ok(pages)
    }
}

/// Checks, fetches and filters a single linked page
async fn pull_content<F>(
    fetcher: &F,
    url: &str,
    filter: &FilterOption,
) -> Result<Vec<String>, CrawlError>
where
    F: PageFetcher + ?Sized,
{
    if !fetcher.exist_page(url).await {
        return Err(CrawlError::PageNotFound {
            url: url.to_string(),
        });
    }

    let page = fetcher.get(url).await?.error_for_status()?;
    Ok(page_content(&fetcher.filter_page_elements(&page.body, filter)))
}

fn is_same_page(link: &str, seed: &Url) -> bool {
    Url::parse(link).map_or(false, |url| url == *seed)
}

fn record(pages: &mut HashMap<String, Vec<String>>, outcome: LinkOutcome) {
    match outcome {
        LinkOutcome::Page(page) => {
            tracing::debug!("Collected {} fragments from {}", page.content.len(), page.url);
            pages.insert(page.url, page.content);
        }
        LinkOutcome::Failed { url, error } => {
            tracing::warn!("Skipping {}: {}", url, error);
        }
    }
}
