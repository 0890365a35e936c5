//! URL handling module for Quill
//!
//! Seed validation and normalization of links discovered on a page.

mod normalize;

pub use normalize::{normalize_link, parse_seed};
