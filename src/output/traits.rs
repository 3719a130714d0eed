//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! error type they share.

use crate::storage::Snapshot;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// An output handler turns one snapshot of the result store into one file.
/// Handlers never see the live store, so every handler of a flush writes
/// the same content.
pub trait OutputHandler: Send + Sync {
    /// Short format name used in log lines
    fn format(&self) -> &'static str;

    /// Destination file
    fn path(&self) -> &Path;

    /// Writes the snapshot, replacing any previous file
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The word → translation pairs to persist
    fn write_snapshot(&self, snapshot: &Snapshot) -> OutputResult<()>;
}
