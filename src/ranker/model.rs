use crate::storage::{rank_key, DocumentStore, RankStore, StorageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Identifier of an indexed document, usually its URL
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(String);

impl Path {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Path {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl From<&str> for Path {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Term counts of one indexed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Occurrences of each term
    pub terms: HashMap<String, u64>,
    /// When the document was indexed
    pub last_modified: DateTime<Utc>,
}

impl Document {
    /// Counts the occurrences of each token
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: HashMap<String, u64> = HashMap::new();
        for token in tokens {
            *terms.entry(token.as_ref().to_string()).or_default() += 1;
        }
        Self {
            terms,
            last_modified: Utc::now(),
        }
    }

    /// Number of occurrences of `term`
    pub fn count(&self, term: &str) -> u64 {
        self.terms.get(term).copied().unwrap_or(0)
    }

    /// Total number of tokens the document was built from
    pub fn total_terms(&self) -> u64 {
        self.terms.values().sum()
    }
}

/// TF-IDF ranking model
///
/// # Scoring
///
/// For a term `t` and a document `p` out of `N` documents:
///
/// - `tf(t, p) = count(t, p) / tokens(p)`, zero for a document without tokens
/// - `idf(t) = log10(N / max(1, df(t)))` where `df(t)` counts documents containing `t`
/// - `tfidf(t, p) = tf(t, p) * idf(t)`
///
/// The model is not synchronized; callers sharing one across tasks wrap it
/// in a lock.
///
/// # Example
///
/// ```
/// use quill_search::ranker::{Model, Path};
///
/// let mut model = Model::default();
/// model
///     .add_documents([("a", vec!["rust", "crawler"])])
///     .add_documents([("b", vec!["go", "crawler"])]);
/// assert_eq!(model.rank(&["rust"]), vec![Path::from("a")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Model {
    docs: HashMap<Path, Document>,
}

impl Model {
    /// Builds a model from path and token pairs
    pub fn new<I, P, T, S>(docs: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<Path>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut model = Self::default();
        model.add_documents(docs);
        model
    }

    /// Indexes documents, replacing any earlier document with the same path
    pub fn add_documents<I, P, T, S>(&mut self, docs: I) -> &mut Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<Path>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (path, tokens) in docs {
            let path = path.into();
            let doc = Document::from_tokens(tokens);
            tracing::trace!("Indexed {} with {} distinct terms", path, doc.terms.len());
            self.docs.insert(path, doc);
        }
        self
    }

    pub fn docs(&self) -> &HashMap<Path, Document> {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Term frequency of `term` in the document at `path`
    pub fn tf(&self, term: &str, path: &Path) -> f64 {
        let Some(doc) = self.docs.get(path) else {
            return 0.0;
        };
        let total = doc.total_terms();
        if total == 0 {
            return 0.0;
        }
        doc.count(term) as f64 / total as f64
    }

    /// Inverse document frequency of `term`
    pub fn idf(&self, term: &str) -> f64 {
        if self.docs.is_empty() {
            return 0.0;
        }
        let containing = self.docs.values().filter(|d| d.count(term) > 0).count();
        (self.docs.len() as f64 / containing.max(1) as f64).log10()
    }

    pub fn tfidf(&self, term: &str, path: &Path) -> f64 {
        self.tf(term, path) * self.idf(term)
    }

    /// Ranks documents against the query terms
    ///
    /// Scores are summed over all terms. Documents scoring zero or less are
    /// dropped; equal scores are ordered by ascending path.
    pub fn rank<S: AsRef<str>>(&self, terms: &[S]) -> Vec<Path> {
        let idfs: Vec<(&str, f64)> = terms
            .iter()
            .map(|t| (t.as_ref(), self.idf(t.as_ref())))
            .collect();

        let mut scored: Vec<(&Path, f64)> = self
            .docs
            .keys()
            .map(|path| {
                let score = idfs
                    .iter()
                    .map(|(term, idf)| self.tf(term, path) * idf)
                    .sum::<f64>();
                (path, score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|(a_path, a), (b_path, b)| {
            b.partial_cmp(a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a_path.cmp(b_path))
        });

        scored.into_iter().map(|(path, _)| path.clone()).collect()
    }

    /// Writes every indexed document to `store`
    pub fn persist(&self, store: &mut dyn DocumentStore) -> StorageResult<()> {
        for (path, doc) in &self.docs {
            store.save(path, doc)?;
        }
        tracing::debug!("Persisted {} documents", self.docs.len());
        Ok(())
    }

    /// Returns the cached ranking for `terms`, computing and caching it on a miss
    pub fn rank_cached<S: AsRef<str>>(
        &self,
        store: &mut dyn RankStore,
        terms: &[S],
    ) -> StorageResult<Vec<Path>> {
        let key = rank_key(terms);
        if let Some(paths) = store.get(&key)? {
            tracing::debug!("Rank cache hit for {}", key);
            return Ok(paths);
        }

        let paths = self.rank(terms);
        store.save(&key, &paths)?;
        Ok(paths)
    }
}
