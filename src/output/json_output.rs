//! JSON dictionary file
//!
//! The whole dictionary is one JSON object, word → translation.

use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::storage::Snapshot;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the snapshot as a single JSON object
pub struct JsonOutputHandler {
    path: PathBuf,
}

impl JsonOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for JsonOutputHandler {
    fn format(&self) -> &'static str {
        "json"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> OutputResult<()> {
        let file = File::create(&self.path).map_err(|source| OutputError::Write {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, snapshot)?;
        writer.flush()?;

        Ok(())
    }
}
