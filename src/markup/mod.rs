//! Markup handling
//!
//! This module turns raw HTML into structured [`Tag`] records:
//! - A pull-based token stream over the html5ever tokenizer
//! - The include/exclude tag filter engine
//! - Tag, tag type, and filter option types

mod filter;
mod tag;
mod tokenizer;

pub use filter::{filter_html, filter_tags};
pub use tag::{is_void_element, FilterMode, FilterOption, Tag, TagType, VOID_ELEMENTS};
pub use tokenizer::{MarkupToken, TokenKind, TokenStream};
