//! Quill: a minimal crawl-and-rank search engine
//!
//! This crate fetches a seed page and the pages it links to, strips their markup
//! down to readable text, and ranks the resulting documents against query terms
//! with TF-IDF.

pub mod config;
pub mod crawler;
pub mod lexer;
pub mod markup;
pub mod ranker;
pub mod storage;
pub mod url;

use crate::crawler::ErrorKind;
use thiserror::Error;

/// Main error type for Quill operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Errors surfaced by the fetcher once its retry policy has given up
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot fetch {url} page ({kind:?}): {source}")]
    Transport {
        url: String,
        kind: ErrorKind,
        source: reqwest::Error,
    },

    #[error("cannot fetch {url} page: exceeded retries after {attempts} attempts{}", describe_last(.last_status, .last_error))]
    RetriesExceeded {
        url: String,
        attempts: u32,
        last_status: Option<u16>,
        last_error: Option<String>,
    },

    #[error("cannot read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus { url: String, status: u16 },
}

impl FetchError {
    /// Returns the HTTP status this error carries, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RetriesExceeded { last_status, .. } => *last_status,
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Body { .. } => None,
        }
    }
}

fn describe_last(status: &Option<u16>, error: &Option<String>) -> String {
    match (status, error) {
        (Some(status), Some(error)) => format!(": {}: last status code {}", error, status),
        (Some(status), None) => format!(": last status code {}", status),
        (None, Some(error)) => format!(": {}", error),
        (None, None) => String::new(),
    }
}

/// Errors that abort a crawl before any link is fetched
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("page doesn't exist, url: {url}")]
    PageNotFound { url: String },

    #[error("incorrect url {url}: {source}")]
    MalformedUrl { url: String, source: UrlError },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result type alias for Quill operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, Fetcher, Page, PageFetcher};
pub use markup::{FilterMode, FilterOption, Tag, TagType};
pub use ranker::{Document, Model, Path};
