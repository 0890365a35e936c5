//! Word and number tokenizer
//!
//! Turns page text into the lowercase terms the ranker indexes. Letters and
//! digits form tokens; everything else separates them.

/// Lazy token generator over a piece of text
///
/// A token is either a run of numeric characters or a run of letters and
/// digits starting with a letter. Tokens are lowercased. Whitespace,
/// punctuation and symbols are never emitted.
///
/// The lexer is an [`Iterator`]; clone it to walk the same text again.
///
/// # Example
///
/// ```
/// use quill_search::lexer::Lexer;
///
/// let tokens = Lexer::new(["Rust 2021, edition!"]).all();
/// assert_eq!(tokens, vec!["rust", "2021", "edition"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    /// Creates a lexer over `fragments`, joined with a single space
    ///
    /// The space keeps the last word of one fragment from fusing with the
    /// first word of the next.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chars = Vec::new();
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                chars.push(' ');
            }
            chars.extend(fragment.as_ref().chars());
        }
        Self { chars, pos: 0 }
    }

    /// Collects every remaining token
    pub fn all(self) -> Vec<String> {
        self.collect()
    }

    fn skip_separators(&mut self) {
        while self.pos < self.chars.len() && !self.chars[self.pos].is_alphanumeric() {
            self.pos += 1;
        }
    }

    fn chop_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.pos < self.chars.len() && predicate(self.chars[self.pos]) {
            self.pos += 1;
        }
        self.chars[start..self.pos]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .collect()
    }
}

impl Iterator for Lexer {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_separators();

        let first = *self.chars.get(self.pos)?;
        if first.is_numeric() {
            Some(self.chop_while(char::is_numeric))
        } else {
            Some(self.chop_while(char::is_alphanumeric))
        }
    }
}
