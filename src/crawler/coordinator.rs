//! Crawler coordinator - main crawl orchestration logic
//!
//! The crawl is a three-level fan-out below the main page:
//!
//! 1. Main page → section links (one request)
//! 2. Section page → pagination links
//! 3. Pagination page → word links
//! 4. Word page → headword and translation, written to the result store
//!
//! Each fetch unit (one fetch plus its parse) holds a permit from the shared
//! [`FetchBudget`] for exactly its own duration. Children are joined with
//! `try_join_all`, so the crawl is one structured tree of futures: the first
//! transient network fault drops every sibling still running, while words
//! already written to the store stay there.
//!
//! Page faults (a missing HTML region, a 404) only prune their own branch.

use crate::config::{Config, CrawlStrategy};
use crate::crawler::budget::FetchBudget;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::pagination::resolve_pagination;
use crate::crawler::parser::{
    extract_links, parse_word_page, Link, SECTION_LINKS, WORD_LINKS,
};
use crate::output::{CrawlStatistics, StatsSnapshot};
use crate::storage::ResultStore;
use crate::url::parse_base;
use crate::ScrapeError;
use futures::future::try_join_all;
use url::Url;

/// Words between two progress log lines
const PROGRESS_INTERVAL: u64 = 1000;

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    fetcher: F,
    base: Url,
    budget: FetchBudget,
    strategy: CrawlStrategy,
    stats: CrawlStatistics,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - Invalid base URL or HTTP client failure
    pub fn from_config(config: &Config) -> Result<Self, ScrapeError> {
        let base = parse_base(&config.site.base_url)?;
        let fetcher = HttpFetcher::from_config(config)?;

        Ok(Self::new(
            fetcher,
            base,
            config.crawler.max_concurrent_fetches as usize,
            config.crawler.strategy,
        ))
    }
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a coordinator over any page source
    ///
    /// `base` is both the main page and the address every href is resolved
    /// against.
    pub fn new(fetcher: F, base: Url, max_concurrent: usize, strategy: CrawlStrategy) -> Self {
        Self {
            fetcher,
            base,
            budget: FetchBudget::new(max_concurrent),
            strategy,
            stats: CrawlStatistics::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn budget(&self) -> &FetchBudget {
        &self.budget
    }

    pub fn statistics(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Runs the whole crawl, writing every word found into `store`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Every branch finished or was skipped on a page fault
    /// * `Err(ScrapeError)` - The first transient fault, or a structural
    ///   fault on the main page; `store` keeps what was collected before it
    pub async fn run(&self, store: &ResultStore) -> Result<(), ScrapeError> {
        tracing::info!(
            "Starting {:?} crawl of {} with at most {} concurrent fetches",
            self.strategy,
            self.base,
            self.budget.capacity()
        );

        let result = match self.strategy {
            CrawlStrategy::Streaming => self.run_streaming(store).await,
            CrawlStrategy::Staged => self.run_staged(store).await,
        };

        let stats = self.stats.snapshot();
        tracing::info!(
            "Crawl finished: {} pages fetched, {} words stored, peak {} concurrent fetches",
            stats.total_pages(),
            store.len(),
            self.budget.peak()
        );

        result
    }

    /// Launches the whole tree at once
    async fn run_streaming(&self, store: &ResultStore) -> Result<(), ScrapeError> {
        let sections = self.section_links().await?;
        tracing::info!("Collecting words from {} sections...", sections.len());

        try_join_all(sections.iter().map(|section| self.crawl_section(section, store))).await?;

        Ok(())
    }

    async fn crawl_section(&self, section: &Link, store: &ResultStore) -> Result<(), ScrapeError> {
        let pages = self.pagination_links(section).await?;
        try_join_all(pages.iter().map(|page| self.crawl_listing(page, store))).await?;
        Ok(())
    }

    async fn crawl_listing(&self, page: &Link, store: &ResultStore) -> Result<(), ScrapeError> {
        let words = self.word_links(page).await?;
        try_join_all(words.iter().map(|word| self.crawl_word(word, store))).await?;
        Ok(())
    }

    /// Finishes each level before starting the next
    ///
    /// Work lists are cut into chunks of the budget size and each chunk is
    /// awaited fully, so permits never contend.
    async fn run_staged(&self, store: &ResultStore) -> Result<(), ScrapeError> {
        let chunk_size = self.budget.capacity();

        let sections = self.section_links().await?;
        tracing::info!(
            "Collecting links to pagination pages of {} sections...",
            sections.len()
        );

        let mut pages = Vec::new();
        for chunk in sections.chunks(chunk_size) {
            let found =
                try_join_all(chunk.iter().map(|section| self.pagination_links(section))).await?;
            pages.extend(found.into_iter().flatten());
        }

        tracing::info!(
            "Collecting links to words from {} pagination pages...",
            pages.len()
        );
        let mut words = Vec::new();
        for chunk in pages.chunks(chunk_size) {
            let found = try_join_all(chunk.iter().map(|page| self.word_links(page))).await?;
            words.extend(found.into_iter().flatten());
        }

        tracing::info!("Collecting {} words...", words.len());
        for (index, chunk) in words.chunks(chunk_size).enumerate() {
            try_join_all(chunk.iter().map(|word| self.crawl_word(word, store))).await?;
            tracing::debug!(
                "Chunk {} done, {} of {} words fetched",
                index + 1,
                ((index + 1) * chunk_size).min(words.len()),
                words.len()
            );
        }

        Ok(())
    }

    /// Level 1: the main page's section links
    ///
    /// A structural fault here is not skipped: there is nothing else to crawl.
    async fn section_links(&self) -> Result<Vec<Link>, ScrapeError> {
        tracing::info!("Collecting links to sections...");

        let _permit = self.budget.acquire().await?;
        let html = self.fetcher.fetch(&self.base).await?;
        let sections = extract_links(&html, SECTION_LINKS, &self.base, &self.base)?;

        if sections.is_empty() {
            tracing::warn!("No sections found on {}", self.base);
        }
        Ok(sections)
    }

    /// Level 2: one section page → its pagination pages
    async fn pagination_links(&self, section: &Link) -> Result<Vec<Link>, ScrapeError> {
        let result = async {
            let _permit = self.budget.acquire().await?;
            let html = self.fetcher.fetch(&section.url).await?;
            self.stats.record_section();
            resolve_pagination(&html, &section.url, &self.base)
        }
        .await;

        let pages = self.skip_page_fault("section", &section.url, result)?;
        tracing::debug!("Section {} has {} pagination pages", section.url, pages.len());
        Ok(pages)
    }

    /// Level 3: one pagination page → its word links
    async fn word_links(&self, page: &Link) -> Result<Vec<Link>, ScrapeError> {
        let result = async {
            let _permit = self.budget.acquire().await?;
            let html = self.fetcher.fetch(&page.url).await?;
            self.stats.record_pagination_page();
            extract_links(&html, WORD_LINKS, &page.url, &self.base)
        }
        .await;

        self.skip_page_fault("pagination page", &page.url, result)
    }

    /// Level 4: one word page → one store entry (or none)
    async fn crawl_word(&self, word: &Link, store: &ResultStore) -> Result<(), ScrapeError> {
        let result = async {
            let _permit = self.budget.acquire().await?;
            let html = self.fetcher.fetch(&word.url).await?;
            self.stats.record_word_page();
            parse_word_page(&html, &word.url)
        }
        .await;

        let entry = match result {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                tracing::trace!("No translation on {}, dropping word", word.url);
                self.stats.record_word_empty();
                return Ok(());
            }
            Err(e) => return self.skip_page_fault("word page", &word.url, Err(e)),
        };

        tracing::debug!("{} → {}", entry.word, entry.translation.trim_end());
        let replaced = store.put(entry.word, entry.translation);
        let stored = self.stats.record_word_stored(replaced);

        if stored % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} words stored, {} fetches in flight",
                stored,
                self.budget.in_flight()
            );
        }

        Ok(())
    }

    /// Turns a page fault into an empty result, logging and counting it
    ///
    /// Every other error is passed through and ends the crawl.
    fn skip_page_fault<T: Default>(
        &self,
        kind: &str,
        url: &Url,
        result: Result<T, ScrapeError>,
    ) -> Result<T, ScrapeError> {
        match result {
            Err(e) if e.is_page_fault() => {
                tracing::warn!("Skipping {} {}: {}", kind, url, e);
                self.stats.record_skipped();
                Ok(T::default())
            }
            other => other,
        }
    }
}
