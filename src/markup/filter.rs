//! Tag filter engine
//!
//! Turns a token stream into [`Tag`] records, either keeping only the
//! subtrees rooted at the target tags (include) or removing them (exclude).
//! Nested elements with the same name as the subtree root are depth-counted,
//! so a subtree always ends at its own matching close tag.

use crate::markup::tag::{is_void_element, FilterMode, FilterOption, Tag};
use crate::markup::tokenizer::{MarkupToken, TokenKind, TokenStream};

/// Filters an HTML document
///
/// # Example
///
/// ```
/// use quill_search::markup::{filter_html, FilterOption, TagType};
///
/// let tags = filter_html(r#"<p>skip</p><a href="/x">keep</a>"#, &FilterOption::links());
/// assert_eq!(tags.len(), 3);
/// assert_eq!(tags[0].tag_type, TagType::OpenTag);
/// assert_eq!(tags[1].body, "keep");
/// ```
pub fn filter_html(html: &str, option: &FilterOption) -> Vec<Tag> {
    filter_tags(TokenStream::new(html), option)
}

/// Filters a token stream, preserving document order
///
/// Whitespace-only text never appears in the output. Doctypes are never
/// treated as targets and never nest. In exclude mode a close tag of a target
/// name with no matching open tag is dropped along with the subtrees.
pub fn filter_tags<I>(tokens: I, option: &FilterOption) -> Vec<Tag>
where
    I: IntoIterator<Item = MarkupToken>,
{
    let mut tokens = tokens.into_iter();
    let mut tags = Vec::new();

    while let Some(token) = tokens.next() {
        match option.mode {
            FilterMode::PassThrough => push_tag(&mut tags, token),
            FilterMode::Exclude => {
                if is_target(&token, option) {
                    skip_subtree(&mut tokens, &token);
                } else {
                    push_tag(&mut tags, token);
                }
            }
            FilterMode::Include => {
                if token.is_opening() && option.targets(&token.name) {
                    capture_subtree(&mut tokens, token, &mut tags);
                }
            }
        }
    }

    tags
}

fn is_target(token: &MarkupToken, option: &FilterOption) -> bool {
    token.kind != TokenKind::Doctype && token.kind != TokenKind::Text && option.targets(&token.name)
}

fn push_tag(tags: &mut Vec<Tag>, token: MarkupToken) {
    let tag = Tag::from(token);
    if !tag.is_blank_body() {
        tags.push(tag);
    }
}

/// Returns true if the element opened by `token` has no content to walk
fn is_leaf(token: &MarkupToken) -> bool {
    token.kind == TokenKind::SelfClosingTag || is_void_element(&token.name)
}

/// Consumes tokens up to and including the close tag matching `root`
fn skip_subtree<I>(tokens: &mut I, root: &MarkupToken)
where
    I: Iterator<Item = MarkupToken>,
{
    // Stray close tags and leaf elements are a subtree of one token.
    if root.kind != TokenKind::StartTag || is_leaf(root) {
        return;
    }

    let mut depth = 1usize;
    for token in tokens.by_ref() {
        if let Some(next) = nesting_step(&token, &root.name, depth) {
            depth = next;
        }
        if depth == 0 {
            break;
        }
    }
}

/// Emits `root` and everything up to and including its matching close tag
fn capture_subtree<I>(tokens: &mut I, root: MarkupToken, tags: &mut Vec<Tag>)
where
    I: Iterator<Item = MarkupToken>,
{
    let leaf = is_leaf(&root);
    let name = root.name.clone();
    push_tag(tags, root);
    if leaf {
        return;
    }

    let mut depth = 1usize;
    for token in tokens.by_ref() {
        if let Some(next) = nesting_step(&token, &name, depth) {
            depth = next;
        }
        push_tag(tags, token);
        if depth == 0 {
            break;
        }
    }
}

/// New depth after `token` inside a subtree rooted at an element called `name`
fn nesting_step(token: &MarkupToken, name: &str, depth: usize) -> Option<usize> {
    if token.name != name {
        return None;
    }
    match token.kind {
        TokenKind::StartTag => Some(depth + 1),
        TokenKind::EndTag => Some(depth - 1),
        _ => None,
    }
}
