//! Crawl statistics
//!
//! Counters are bumped by the coordinator as fetch units complete and read
//! once at the end of the run for the summary.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by every fetch unit
#[derive(Debug, Default)]
pub struct CrawlStatistics {
    sections: AtomicU64,
    pagination_pages: AtomicU64,
    word_pages: AtomicU64,
    words_stored: AtomicU64,
    words_overwritten: AtomicU64,
    words_empty: AtomicU64,
    pages_skipped: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Section pages fetched
    pub sections: u64,
    /// Pagination pages fetched
    pub pagination_pages: u64,
    /// Word detail pages fetched
    pub word_pages: u64,
    /// Words written to the store
    pub words_stored: u64,
    /// Writes that replaced an earlier translation
    pub words_overwritten: u64,
    /// Words dropped because no translation block qualified
    pub words_empty: u64,
    /// Pages skipped on structural faults or non-transient HTTP statuses
    pub pages_skipped: u64,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_section(&self) {
        self.sections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pagination_page(&self) {
        self.pagination_pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_word_page(&self) {
        self.word_pages.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a store write; `replaced` is the result of `ResultStore::put`
    ///
    /// Returns the number of writes recorded so far, this one included.
    pub fn record_word_stored(&self, replaced: bool) -> u64 {
        if replaced {
            self.words_overwritten.fetch_add(1, Ordering::Relaxed);
        }
        self.words_stored.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_word_empty(&self) {
        self.words_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.pages_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sections: self.sections.load(Ordering::Relaxed),
            pagination_pages: self.pagination_pages.load(Ordering::Relaxed),
            word_pages: self.word_pages.load(Ordering::Relaxed),
            words_stored: self.words_stored.load(Ordering::Relaxed),
            words_overwritten: self.words_overwritten.load(Ordering::Relaxed),
            words_empty: self.words_empty.load(Ordering::Relaxed),
            pages_skipped: self.pages_skipped.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Total pages fetched across all levels, main page excluded
    pub fn total_pages(&self) -> u64 {
        self.sections + self.pagination_pages + self.word_pages
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `peak_in_flight` - Highest number of concurrent fetches observed
pub fn print_statistics(stats: &StatsSnapshot, peak_in_flight: usize) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages fetched:");
    println!("  Sections: {}", stats.sections);
    println!("  Pagination pages: {}", stats.pagination_pages);
    println!("  Word pages: {}", stats.word_pages);
    println!("  Peak concurrent fetches: {}", peak_in_flight);
    println!();

    println!("Words:");
    println!("  Stored: {}", stats.words_stored);
    println!("  Overwritten: {}", stats.words_overwritten);
    println!("  Empty translation: {}", stats.words_empty);
    println!();

    if stats.pages_skipped > 0 {
        println!("Skipped pages: {}", stats.pages_skipped);
        println!();
    }
}
