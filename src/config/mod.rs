//! Configuration module for Quill
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so running without a file is equivalent to an
//! empty one.
//!
//! # Example
//!
//! ```no_run
//! use quill_search::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("quill.toml")).unwrap();
//! println!("Fetching up to {} links at once", config.crawler.max_concurrent_fetches);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, UserAgentConfig, DEFAULT_EXCLUDE_TAGS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
