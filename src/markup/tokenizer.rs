//! Pull-based markup token stream backed by the html5ever tokenizer
//!
//! html5ever pushes tokens into a sink; the sink here buffers them so the
//! filter engine can pull one token at a time.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag as HtmlTag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};

/// Kind of a markup token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Doctype,
    StartTag,
    EndTag,
    SelfClosingTag,
    Text,
}

/// A single token pulled from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupToken {
    pub kind: TokenKind,
    /// Lowercase element name; empty for text and doctypes
    pub name: String,
    /// Decoded text for text tokens, the doctype name for doctypes
    pub text: String,
    /// Re-serialized form of the token
    pub raw: String,
    /// Attribute pairs in source order
    pub attrs: Vec<(String, String)>,
}

impl MarkupToken {
    /// Returns true for a start or self-closing tag
    pub fn is_opening(&self) -> bool {
        matches!(self.kind, TokenKind::StartTag | TokenKind::SelfClosingTag)
    }

    fn text(text: String) -> Self {
        Self {
            kind: TokenKind::Text,
            name: String::new(),
            raw: escape_text(&text),
            text,
            attrs: Vec::new(),
        }
    }

    fn from_tag(tag: HtmlTag) -> Self {
        let kind = match (tag.kind, tag.self_closing) {
            (TagKind::StartTag, false) => TokenKind::StartTag,
            (TagKind::StartTag, true) => TokenKind::SelfClosingTag,
            (TagKind::EndTag, _) => TokenKind::EndTag,
        };
        let name = tag.name.to_string();
        let attrs: Vec<(String, String)> = tag
            .attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        let raw = serialize_tag(kind, &name, &attrs);

        Self {
            kind,
            name,
            text: String::new(),
            raw,
            attrs,
        }
    }
}

/// Pull-based stream of markup tokens
///
/// Comments and parse errors are dropped, adjacent character data is merged
/// into one text token, and the contents of raw-text elements such as
/// `script` and `style` arrive as a single text token.
#[derive(Debug)]
pub struct TokenStream {
    tokens: std::vec::IntoIter<MarkupToken>,
}

impl TokenStream {
    /// Tokenizes a whole document
    pub fn new(html: &str) -> Self {
        let mut input = BufferQueue::new();
        input.push_back(StrTendril::from_slice(html));

        let mut tokenizer = Tokenizer::new(Collector::default(), TokenizerOpts::default());
        let _ = tokenizer.feed(&mut input);
        tokenizer.end();

        let mut collector = tokenizer.sink;
        collector.flush_text();

        Self {
            tokens: collector.tokens.into_iter(),
        }
    }
}

impl Iterator for TokenStream {
    type Item = MarkupToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tokens.size_hint()
    }
}

#[derive(Default)]
struct Collector {
    tokens: Vec<MarkupToken>,
    pending_text: String,
}

impl Collector {
    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let text = std::mem::take(&mut self.pending_text);
            self.tokens.push(MarkupToken::text(text));
        }
    }
}

impl TokenSink for Collector {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => {
                self.pending_text.push_str(&text);
            }
            Token::TagToken(tag) => {
                self.flush_text();
                let switch_to = raw_kind_for(&tag);
                self.tokens.push(MarkupToken::from_tag(tag));
                if let Some(kind) = switch_to {
                    return TokenSinkResult::RawData(kind);
                }
            }
            Token::DoctypeToken(doctype) => {
                self.flush_text();
                let name = doctype.name.map(|n| n.to_string()).unwrap_or_default();
                self.tokens.push(MarkupToken {
                    kind: TokenKind::Doctype,
                    name: String::new(),
                    raw: format!("<!DOCTYPE {}>", name),
                    text: name,
                    attrs: Vec::new(),
                });
            }
            Token::CommentToken(_) => self.flush_text(),
            Token::EOFToken => self.flush_text(),
            Token::NullCharacterToken | Token::ParseError(_) => {}
        }
        TokenSinkResult::Continue
    }
}

// Without a tree builder nobody tells the tokenizer that these elements hold
// raw text, so the sink does it.
fn raw_kind_for(tag: &HtmlTag) -> Option<RawKind> {
    if tag.kind != TagKind::StartTag || tag.self_closing {
        return None;
    }
    match &*tag.name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

fn serialize_tag(kind: TokenKind, name: &str, attrs: &[(String, String)]) -> String {
    if kind == TokenKind::EndTag {
        return format!("</{}>", name);
    }

    let mut raw = format!("<{}", name);
    for (key, value) in attrs {
        raw.push(' ');
        raw.push_str(key);
        raw.push_str("=\"");
        raw.push_str(&value.replace('&', "&amp;").replace('"', "&quot;"));
        raw.push('"');
    }
    if kind == TokenKind::SelfClosingTag {
        raw.push_str(" /");
    }
    raw.push('>');
    raw
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
