//! Output module for persisting the scraped dictionary
//!
//! This module handles:
//! - Writing the result store to JSON and CSV from one shared snapshot
//! - Recording crawl statistics for the end-of-run summary

mod csv_output;
mod json_output;
pub mod stats;
mod traits;

pub use csv_output::CsvOutputHandler;
pub use json_output::JsonOutputHandler;
pub use stats::{print_statistics, CrawlStatistics, StatsSnapshot};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::config::OutputConfig;
use crate::storage::ResultStore;

/// Writes the result store through every configured output handler
///
/// `flush` is meant to be called unconditionally, after a clean crawl as
/// well as after a failed or interrupted one. It never panics; a handler
/// that fails is logged and the remaining handlers still run.
pub struct PersistenceSink {
    handlers: Vec<Box<dyn OutputHandler>>,
}

impl PersistenceSink {
    /// Creates a sink with no handlers
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Creates the JSON + CSV sink described by the configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new()
            .with_handler(JsonOutputHandler::new(&config.json_path))
            .with_handler(CsvOutputHandler::new(&config.csv_path))
    }

    /// Adds an output handler
    pub fn with_handler(mut self, handler: impl OutputHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Persists the current content of the store
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of entries written to every handler
    /// * `Err(OutputError)` - The first handler failure; later handlers were
    ///   still attempted
    pub fn flush(&self, store: &ResultStore) -> OutputResult<usize> {
        let snapshot = store.snapshot();
        let mut first_error = None;

        for handler in &self.handlers {
            match handler.write_snapshot(&snapshot) {
                Ok(()) => {
                    tracing::info!(
                        "Wrote {} entries to {} ({})",
                        snapshot.len(),
                        handler.path().display(),
                        handler.format()
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to write {} output {}: {}",
                        handler.format(),
                        handler.path().display(),
                        e
                    );
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(snapshot.len()),
        }
    }
}

impl Default for PersistenceSink {
    fn default() -> Self {
        Self::new()
    }
}
