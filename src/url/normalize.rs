use crate::UrlError;
use url::Url;

/// Parses and checks a seed URL before any network call is made
///
/// # Examples
///
/// ```
/// use quill_search::url::parse_seed;
///
/// let seed = parse_seed("https://example.com/docs").unwrap();
/// assert_eq!(seed.host_str(), Some("example.com"));
/// assert!(parse_seed("ftp://example.com/").is_err());
/// ```
pub fn parse_seed(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(url_str.to_string()));
    }

    Ok(url)
}

/// Normalizes an `href` found on the page at `base`
///
/// # Normalization Steps
///
/// 1. Drop everything from the first `#`
/// 2. Discard empty links
/// 3. `http://` and `https://` links pass through unchanged
/// 4. Scheme-relative `//host/path` links get `https:` prefixed
/// 5. Root-relative `/path` links resolve against the base scheme, host and port
///
/// Any other form (relative paths, `mailto:`, `javascript:`) yields `None`.
///
/// # Examples
///
/// ```
/// use quill_search::url::normalize_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert_eq!(
///     normalize_link("/about#section", &base).as_deref(),
///     Some("https://example.com/about")
/// );
/// ```
pub fn normalize_link(href: &str, base: &Url) -> Option<String> {
    let link = href.split('#').next().unwrap_or_default().trim();

    if link.is_empty() {
        return None;
    }

    if link.starts_with("http://") || link.starts_with("https://") {
        return Some(link.to_string());
    }

    if link.starts_with("//") {
        return Some(format!("https://{}", link.trim_start_matches('/')));
    }

    if link.starts_with('/') {
        let host = base.host_str()?;
        let authority = match base.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        return Some(format!(
            "{}://{}/{}",
            base.scheme(),
            authority,
            link.trim_start_matches('/')
        ));
    }

    None
}
