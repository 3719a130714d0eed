//! HTML parsing for the dictionary site
//!
//! This module handles:
//! - Selecting anchors inside a fixed page region (sections, word lists)
//! - Resolving their hrefs against the site base
//! - Extracting headword and translation from a word page
//!
//! Every function takes the page body as `&str` and returns owned data, so no
//! parsed document is ever held across an await point.

use crate::url::resolve_link;
use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Container of the section links on the main page
pub const SECTION_LINKS: &str = "div.contents-wrap";

/// Container of the word links on a pagination page
pub const WORD_LINKS: &str = "div.terms-wrap";

/// Title region of a word page
pub const WORD_TITLE: &str = "div#TerminTitle h1";

/// Translation region of a word page
pub const WORD_TRANSLATION: &str = "dd.descript";

const ANCHOR: &str = "a[href]";
const TRANSLATION_BLOCK: &str = "div";

/// A link discovered on a page
///
/// `url` is always absolute, resolved against the site base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: Url,
    pub display_text: Option<String>,
}

/// One dictionary entry extracted from a word page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub translation: String,
}

/// An anchor as it appears in the markup, before resolution
#[derive(Debug, Clone)]
pub(crate) struct Anchor {
    pub href: String,
    pub text: Option<String>,
}

pub(crate) fn selector(css: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css))
}

/// Finds the first element matching `css`, or reports it missing
pub(crate) fn require<'a>(
    scope: impl IntoIterator<Item = ElementRef<'a>>,
    css: &'static str,
    page_url: &Url,
) -> Result<ElementRef<'a>, ScrapeError> {
    scope
        .into_iter()
        .next()
        .ok_or_else(|| ScrapeError::MissingElement {
            url: page_url.to_string(),
            selector: css,
        })
}

/// Collects every `a[href]` below an element, in document order
pub(crate) fn anchors_in(element: ElementRef<'_>) -> Result<Vec<Anchor>, ScrapeError> {
    let anchor = selector(ANCHOR)?;

    Ok(element
        .select(&anchor)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let text = a.text().collect::<String>().trim().to_string();
            Some(Anchor {
                href: href.to_string(),
                text: (!text.is_empty()).then_some(text),
            })
        })
        .collect())
}

/// Resolves anchors to links, skipping hrefs that cannot be fetched
pub(crate) fn resolve_anchors(anchors: Vec<Anchor>, base: &Url) -> Vec<Link> {
    anchors
        .into_iter()
        .filter_map(|anchor| match resolve_link(base, &anchor.href) {
            Ok(url) => Some(Link {
                url,
                display_text: anchor.text,
            }),
            Err(e) => {
                tracing::debug!("Skipping href {:?}: {}", anchor.href, e);
                None
            }
        })
        .collect()
}

/// Extracts the links inside the first element matching `container`
///
/// # Arguments
///
/// * `html` - The page body
/// * `container` - CSS selector of the region holding the links
/// * `page_url` - URL the page was fetched from (for error reporting)
/// * `base` - Site base address hrefs are resolved against
///
/// # Returns
///
/// * `Ok(Vec<Link>)` - Links in document order; empty when the region has none
/// * `Err(ScrapeError::MissingElement)` - The region is not on the page
///
/// # Example
///
/// ```
/// use tatdict::crawler::{extract_links, WORD_LINKS};
/// use url::Url;
///
/// let html = r#"<div class="terms-wrap"><a href="/w/1">алма</a></div>"#;
/// let base = Url::parse("https://dict.example.com/").unwrap();
/// let links = extract_links(html, WORD_LINKS, &base, &base).unwrap();
/// assert_eq!(links[0].url.as_str(), "https://dict.example.com/w/1");
/// assert_eq!(links[0].display_text.as_deref(), Some("алма"));
/// ```
pub fn extract_links(
    html: &str,
    container: &'static str,
    page_url: &Url,
    base: &Url,
) -> Result<Vec<Link>, ScrapeError> {
    let document = Html::parse_document(html);
    let region_selector = selector(container)?;
    let region = require(document.select(&region_selector), container, page_url)?;

    Ok(resolve_anchors(anchors_in(region)?, base))
}

/// Extracts the headword and translation from a word page
///
/// Every `div` inside the translation region is one block. Blocks are
/// trimmed; empty blocks and blocks ending in `.` (grammatical tags) are
/// dropped. The rest are joined in document order, each followed by `\n`.
///
/// # Returns
///
/// * `Ok(Some(WordEntry))` - The page has a non-empty translation
/// * `Ok(None)` - No block qualified; the word is dropped
/// * `Err(ScrapeError::MissingElement)` - Title or translation region missing
pub fn parse_word_page(html: &str, page_url: &Url) -> Result<Option<WordEntry>, ScrapeError> {
    let document = Html::parse_document(html);

    let title_selector = selector(WORD_TITLE)?;
    let word = require(document.select(&title_selector), WORD_TITLE, page_url)?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    if word.is_empty() {
        return Err(ScrapeError::MissingElement {
            url: page_url.to_string(),
            selector: WORD_TITLE,
        });
    }

    let translation_selector = selector(WORD_TRANSLATION)?;
    let region = require(
        document.select(&translation_selector),
        WORD_TRANSLATION,
        page_url,
    )?;

    let block_selector = selector(TRANSLATION_BLOCK)?;
    let mut translation = String::new();
    for block in region.select(&block_selector) {
        let text = block.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() || text.ends_with('.') {
            continue;
        }
        translation.push_str(text);
        translation.push('\n');
    }

    if translation.is_empty() {
        return Ok(None);
    }

    Ok(Some(WordEntry { word, translation }))
}
