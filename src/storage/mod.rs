//! Storage module for persisting the ranking model
//!
//! Only the ports live here: a document store keyed by path and a rank cache
//! keyed by query. Backends implement the traits outside this crate.

mod traits;

pub use traits::{DocumentStore, RankStore, StorageError, StorageResult};

use sha2::{Digest, Sha256};

const TERM_SEPARATOR: char = '\u{1f}';

/// Computes the rank cache key for a query
///
/// The key is the SHA-256 hex digest of the terms joined with the ASCII unit
/// separator, so `["ab", "c"]` and `["a", "bc"]` never collide. Term order
/// matters.
///
/// # Example
///
/// ```
/// use quill_search::storage::rank_key;
///
/// let key = rank_key(&["rust", "crawler"]);
/// assert_eq!(key.len(), 64);
/// assert_ne!(key, rank_key(&["crawler", "rust"]));
/// ```
pub fn rank_key<S: AsRef<str>>(terms: &[S]) -> String {
    let mut hasher = Sha256::new();
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(TERM_SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(term.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}
