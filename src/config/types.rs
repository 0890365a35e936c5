use serde::Deserialize;
use std::time::Duration;

/// Tags stripped from a page before its text is collected
pub const DEFAULT_EXCLUDE_TAGS: &[&str] = &["script", "style", "img", "iframe", "noscript"];

/// Main configuration structure for Quill
///
/// Every section is optional in the TOML file; missing sections fall back to
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// HTTP fetching and retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Per-request timeout (milliseconds)
    pub timeout_ms: u64,

    /// Connection establishment timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Number of retries after the first attempt
    pub retry_attempts: u32,

    /// Pause before retrying a timed out or rate limited request (milliseconds)
    pub backoff_ms: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 3_000,
            connect_timeout_ms: 2_000,
            retry_attempts: 5,
            backoff_ms: 3_000,
            max_redirects: 10,
        }
    }
}

/// Crawl fan-out configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of link fetches in flight at once
    pub max_concurrent_fetches: usize,

    /// Overall deadline for one crawl; unset means no deadline
    pub crawl_timeout_secs: Option<u64>,

    /// Tags whose subtrees are dropped when collecting page text
    pub exclude_tags: Vec<String>,
}

impl CrawlerConfig {
    pub fn crawl_timeout(&self) -> Option<Duration> {
        self.crawl_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 16,
            crawl_timeout_secs: None,
            exclude_tags: DEFAULT_EXCLUDE_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub name: String,

    /// Version of the crawler
    pub version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!("{}/{} (+{})", self.name, self.version, self.contact_url)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "Quill".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/quill".to_string(),
        }
    }
}
