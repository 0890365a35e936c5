use crate::markup::tokenizer::{MarkupToken, TokenKind};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Elements that never have a closing tag and therefore never nest
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Returns true if `name` is a void element such as `meta` or `img`
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Kind of a [`Tag`] record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    /// `<!DOCTYPE ...>`
    Doctype,
    /// `<a>`
    OpenTag,
    /// `</a>`
    CloseTag,
    /// `<br />`
    SelfCloseTag,
    /// Text between tags
    Body,
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Doctype => "Doctype",
            Self::OpenTag => "OpenTag",
            Self::CloseTag => "CloseTag",
            Self::SelfCloseTag => "SelfCloseTag",
            Self::Body => "Body",
        };
        write!(f, "{}", s)
    }
}

impl From<TokenKind> for TagType {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Doctype => Self::Doctype,
            TokenKind::StartTag => Self::OpenTag,
            TokenKind::EndTag => Self::CloseTag,
            TokenKind::SelfClosingTag => Self::SelfCloseTag,
            TokenKind::Text => Self::Body,
        }
    }
}

/// One structured record produced by the filter engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Element name; `DOCTYPE` for doctypes, empty for text
    pub name: String,

    /// Text content; empty for open, close and self-closing tags
    pub body: String,

    pub tag_type: TagType,

    /// Re-serialized token bytes
    pub raw: Vec<u8>,

    /// Attributes with non-empty names; empty when the token carried none
    pub attributes: HashMap<String, String>,
}

impl Tag {
    /// Returns true for a text record whose content is only whitespace
    pub fn is_blank_body(&self) -> bool {
        self.tag_type == TagType::Body && self.body.trim().is_empty()
    }

    /// Looks up an attribute value
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    fn add_attribute(&mut self, key: String, value: String) {
        if key.is_empty() {
            return;
        }
        self.attributes.insert(key, value);
    }
}

impl From<MarkupToken> for Tag {
    fn from(token: MarkupToken) -> Self {
        let (name, body) = match token.kind {
            TokenKind::Doctype => ("DOCTYPE".to_string(), token.text),
            TokenKind::Text => (String::new(), token.text),
            _ => (token.name, String::new()),
        };

        let mut tag = Tag {
            name,
            body,
            tag_type: token.kind.into(),
            raw: token.raw.into_bytes(),
            attributes: HashMap::new(),
        };

        for (key, value) in token.attrs {
            tag.add_attribute(key, value);
        }

        tag
    }
}

/// How a [`FilterOption`] treats its target tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Keep every token
    #[default]
    PassThrough,
    /// Keep only the subtrees rooted at a target tag
    Include,
    /// Drop the subtrees rooted at a target tag
    Exclude,
}

/// Target tag set and mode for the filter engine
///
/// The default value is an explicit pass-through: no tags, nothing removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterOption {
    pub tags: HashSet<String>,
    pub mode: FilterMode,
}

impl FilterOption {
    /// Keeps only the subtrees of the named tags
    pub fn include<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_mode(tags, FilterMode::Include)
    }

    /// Removes the subtrees of the named tags
    pub fn exclude<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_mode(tags, FilterMode::Exclude)
    }

    /// Keeps everything
    pub fn none() -> Self {
        Self::default()
    }

    /// Anchor tags only, for link discovery
    pub fn links() -> Self {
        Self::include(["a"])
    }

    /// Drops scripts, styles, images, frames and noscript fallbacks
    pub fn content_default() -> Self {
        Self::exclude(crate::config::DEFAULT_EXCLUDE_TAGS.iter())
    }

    fn with_mode<I, S>(tags: I, mode: FilterMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|t| t.as_ref().to_ascii_lowercase())
                .collect(),
            mode,
        }
    }

    /// Returns true if this option filters nothing
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.mode == FilterMode::PassThrough
    }

    /// Returns true if `name` is one of the target tags
    pub fn targets(&self, name: &str) -> bool {
        self.tags.contains(name)
    }
}
