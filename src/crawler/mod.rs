//! Crawler module for dictionary page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with error classification
//! - Link extraction, pagination resolution and word page parsing
//! - The fetch budget capping in-flight requests
//! - Overall crawl coordination

mod budget;
mod coordinator;
mod fetcher;
mod pagination;
mod parser;

pub use crate::config::CrawlStrategy;
pub use budget::{FetchBudget, FetchPermit};
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_page, HttpFetcher, PageFetcher};
pub use pagination::{first_page_href, resolve_pagination, PAGE_NAV};
pub use parser::{
    extract_links, parse_word_page, Link, WordEntry, SECTION_LINKS, WORD_LINKS, WORD_TITLE,
    WORD_TRANSLATION,
};

use crate::storage::ResultStore;
use crate::ScrapeError;
use std::future::Future;

/// Runs a crawl until it finishes or `interrupt` resolves
///
/// When `interrupt` wins, the crawl future is dropped: in-flight fetches are
/// abandoned, their permits released, the budget is closed so the
/// coordinator starts no further fetches, and `ScrapeError::Interrupted` is
/// returned. Either way `store` holds every word committed so far and is
/// ready to be flushed.
///
/// # Arguments
///
/// * `coordinator` - The configured coordinator
/// * `store` - Result store the crawl writes into
/// * `interrupt` - Resolves when the operator asks to stop
///
/// # Example
///
/// ```no_run
/// use tatdict::config::Config;
/// use tatdict::crawler::{crawl, Coordinator};
/// use tatdict::storage::ResultStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let coordinator = Coordinator::from_config(&Config::default())?;
/// let store = ResultStore::new();
/// crawl(&coordinator, &store, async { let _ = tokio::signal::ctrl_c().await; }).await?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl<F: PageFetcher>(
    coordinator: &Coordinator<F>,
    store: &ResultStore,
    interrupt: impl Future<Output = ()>,
) -> Result<(), ScrapeError> {
    tokio::select! {
        result = coordinator.run(store) => result,
        _ = interrupt => {
            coordinator.budget().close();
            tracing::warn!(
                "Crawl interrupted with {} fetches in flight; keeping {} words collected so far",
                coordinator.budget().in_flight(),
                store.len()
            );
            Err(ScrapeError::Interrupted)
        }
    }
}
