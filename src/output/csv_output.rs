//! CSV dictionary file
//!
//! Headerless, two columns (word, translation), one record per entry.
//! Translations carry embedded newlines, which the writer quotes.

use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::storage::Snapshot;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Writes the snapshot as headerless two-column CSV
pub struct CsvOutputHandler {
    path: PathBuf,
}

impl CsvOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for CsvOutputHandler {
    fn format(&self) -> &'static str {
        "csv"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> OutputResult<()> {
        let file = File::create(&self.path).map_err(|source| OutputError::Write {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);

        for (word, translation) in snapshot {
            writer.write_record([word.as_str(), translation.as_str()])?;
        }
        writer.flush()?;

        Ok(())
    }
}
