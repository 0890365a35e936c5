//! TF-IDF ranking
//!
//! Documents are indexed as term counts keyed by [`Path`] and ranked against
//! a query by summed TF-IDF score.

mod model;

pub use model::{Document, Model, Path};
