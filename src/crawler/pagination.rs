//! Pagination resolution for section pages
//!
//! A section lists its words over several pages. The page-nav widget links
//! every page but the first; the first page's href is the last widget href
//! with its final `&` parameter removed.

use crate::crawler::parser::{anchors_in, require, resolve_anchors, selector, Anchor, Link};
use crate::ScrapeError;
use scraper::Html;
use url::Url;

/// The pagination widget on a section page
pub const PAGE_NAV: &str = "div.page-nav";

const LINK_GROUP: &str = "ul";

/// Derives the first-page href from the last pagination href
///
/// Everything from the final `&` onward is dropped. An href without `&` is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use tatdict::crawler::first_page_href;
///
/// assert_eq!(first_page_href("/contents.nsf/ru/?f=a&p=9"), "/contents.nsf/ru/?f=a");
/// assert_eq!(first_page_href("/contents.nsf/ru/"), "/contents.nsf/ru/");
/// ```
pub fn first_page_href(last_href: &str) -> &str {
    match last_href.rfind('&') {
        Some(index) => &last_href[..index],
        None => last_href,
    }
}

/// Resolves every pagination page of a section
///
/// Takes the anchors of the widget's last link group, then appends a clone
/// of the last anchor whose href is rewritten by [`first_page_href`].
///
/// # Arguments
///
/// * `html` - The section page body
/// * `page_url` - URL the section page was fetched from
/// * `base` - Site base address hrefs are resolved against
///
/// # Returns
///
/// * `Ok(Vec<Link>)` - Widget links followed by the synthesized first page
/// * `Err(ScrapeError::PaginationNotFound)` - No widget, no link group, or an
///   empty last group
pub fn resolve_pagination(html: &str, page_url: &Url, base: &Url) -> Result<Vec<Link>, ScrapeError> {
    let mut anchors = widget_anchors(html, page_url)?;

    let last = anchors
        .last()
        .cloned()
        .ok_or_else(|| not_found(page_url))?;

    let first = Anchor {
        href: first_page_href(&last.href).to_string(),
        text: last.text,
    };
    if first.href == last.href {
        tracing::debug!(
            "Last pagination href {:?} on {} has no '&'; first page is the same page",
            last.href,
            page_url
        );
    }
    anchors.push(first);

    Ok(resolve_anchors(anchors, base))
}

fn widget_anchors(html: &str, page_url: &Url) -> Result<Vec<Anchor>, ScrapeError> {
    let document = Html::parse_document(html);

    let nav_selector = selector(PAGE_NAV)?;
    let nav = require(document.select(&nav_selector), PAGE_NAV, page_url)
        .map_err(|_| not_found(page_url))?;

    let group_selector = selector(LINK_GROUP)?;
    let group = nav
        .select(&group_selector)
        .last()
        .ok_or_else(|| not_found(page_url))?;

    anchors_in(group)
}

fn not_found(page_url: &Url) -> ScrapeError {
    ScrapeError::PaginationNotFound {
        url: page_url.to_string(),
    }
}
