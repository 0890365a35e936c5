//! Storage traits and error types
//!
//! This module defines the ports a persistence backend implements for the
//! ranking model, and the associated error type.

use crate::ranker::{Document, Path};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persists indexed documents by path
pub trait DocumentStore {
    /// Stores `doc` under `path`, replacing any previous document
    fn save(&mut self, path: &Path, doc: &Document) -> StorageResult<()>;

    /// Loads the document stored under `path`
    fn get(&self, path: &Path) -> StorageResult<Option<Document>>;

    /// Removes the document stored under `path`; missing paths are not an error
    fn remove(&mut self, path: &Path) -> StorageResult<()>;
}

/// Caches rankings by query
///
/// Keys are produced by [`super::rank_key`].
pub trait RankStore {
    /// Stores the ranked paths for a query key
    fn save(&mut self, key: &str, paths: &[Path]) -> StorageResult<()>;

    /// Loads the ranked paths for a query key
    fn get(&self, key: &str) -> StorageResult<Option<Vec<Path>>>;

    /// Drops the cached ranking for a query key
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}
