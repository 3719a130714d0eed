//! Configuration module for tatdict
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file crawls the public site.
//!
//! # Example
//!
//! ```no_run
//! use tatdict::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tatdict.toml")).unwrap();
//! println!("Fetch budget: {}", config.crawler.max_concurrent_fetches);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlStrategy, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig,
    DEFAULT_BASE_URL, DEFAULT_CSV_PATH, DEFAULT_JSON_PATH,
};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
pub use validation::validate;
