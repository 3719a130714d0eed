//! URL handling module for tatdict
//!
//! Every href found on the dictionary site is resolved against the site's
//! base address, never against the page it was found on. Section, pagination
//! and word links are all written relative to the site root.

use crate::UrlError;
use url::Url;

/// Parses the configured base address
///
/// The path is forced to end with `/` so that relative hrefs land under it
/// rather than replacing its last segment.
pub fn parse_base(base: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(base)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_fragment(None);

    Ok(url)
}

/// Resolves an href against the base address
///
/// Absolute hrefs are kept as they are. The fragment is dropped since it
/// never changes the fetched document.
///
/// # Errors
///
/// * `UrlError::Unsupported` - empty, fragment-only, or non-navigational
///   (`javascript:`, `mailto:`, `tel:`, `data:`) hrefs
/// * `UrlError::InvalidScheme` - the resolved URL is not http(s)
/// * `UrlError::Parse` - the href cannot be joined onto the base
///
/// # Examples
///
/// ```
/// use tatdict::url::{parse_base, resolve_link};
///
/// let base = parse_base("https://dict.example.com/").unwrap();
/// let url = resolve_link(&base, "/contents.php?p=2").unwrap();
/// assert_eq!(url.as_str(), "https://dict.example.com/contents.php?p=2");
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Err(UrlError::Unsupported(href.to_string()));
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return Err(UrlError::Unsupported(href.to_string()));
    }

    let mut url = base.join(href)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    url.set_fragment(None);

    Ok(url)
}
