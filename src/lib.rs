//! tatdict: a Tatar–Russian dictionary scraper
//!
//! This crate crawls the paginated dictionary site, extracts headword and
//! translation pairs, and saves them as JSON and CSV.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for tatdict operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection to {url} dropped: {source}")]
    Connection { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected element `{selector}` not found on {url}")]
    MissingElement { url: String, selector: &'static str },

    #[error("Pagination not found on {url}")]
    PaginationNotFound { url: String },

    #[error("Invalid CSS selector `{0}`")]
    Selector(&'static str),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Fetch budget closed")]
    BudgetClosed,

    #[error("Crawl interrupted by operator")]
    Interrupted,
}

impl ScrapeError {
    /// Returns true for network faults that should stop the whole crawl
    ///
    /// Timeouts, dropped connections and overload statuses (429, 5xx) all
    /// mean the origin is not keeping up with the request rate.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true for faults confined to a single page
    ///
    /// These are skipped and logged; the rest of the crawl carries on. Client
    /// errors that are neither timeouts nor connection faults (a redirect
    /// loop, an undecodable body) belong to the page that caused them.
    pub fn is_page_fault(&self) -> bool {
        match self {
            Self::MissingElement { .. } | Self::PaginationNotFound { .. } | Self::Http { .. } => {
                true
            }
            Self::Status { .. } => !self.is_transient(),
            _ => false,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Unsupported link: {0}")]
    Unsupported(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for tatdict operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlStrategy, Link};
pub use output::PersistenceSink;
pub use storage::ResultStore;
