//! Extraction of readable text and outbound links from filtered tags
//!
//! The fetcher filters a page into [`Tag`] records; this module turns those
//! records into what the crawler keeps.

use crate::markup::{Tag, TagType};
use crate::url::normalize_link;
use url::Url;

/// Collects the text fragments of a filtered page
///
/// One fragment per text record, in document order. Whitespace-only text is
/// never included.
pub fn page_content(tags: &[Tag]) -> Vec<String> {
    tags.iter()
        .filter(|tag| tag.tag_type == TagType::Body && !tag.is_blank_body())
        .map(|tag| tag.body.clone())
        .collect()
}

/// Extracts outbound links from anchor tags
///
/// # Link Extraction Rules
///
/// - Only open tags carrying an `href` attribute are considered
/// - Each `href` is normalized against `base` (see [`normalize_link`]);
///   links that do not normalize are skipped
/// - Duplicates are removed, keeping first-seen order
///
/// # Example
///
/// ```
/// use quill_search::crawler::extract_links;
/// use quill_search::markup::{filter_html, FilterOption};
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let tags = filter_html(r#"<a href="/a">A</a><a href="/a#x">again</a>"#, &FilterOption::links());
/// assert_eq!(extract_links(&tags, &base), vec!["https://example.com/a"]);
/// ```
pub fn extract_links(tags: &[Tag], base: &Url) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();

    for tag in tags {
        if !matches!(tag.tag_type, TagType::OpenTag | TagType::SelfCloseTag) {
            continue;
        }

        let Some(href) = tag.attribute("href") else {
            continue;
        };

        match normalize_link(href, base) {
            Some(link) => {
                if !links.contains(&link) {
                    links.push(link);
                }
            }
            None => tracing::trace!("Skipping link {:?} on {}", href, base),
        }
    }

    links
}
