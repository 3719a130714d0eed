//! In-memory result store
//!
//! The store is the one piece of state every word task writes to. It is
//! owned by the caller of the crawl and lent to the coordinator by reference,
//! so it outlives an interrupted or failed crawl and can always be flushed.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Ordered copy of the store, taken once per flush
pub type Snapshot = BTreeMap<String, String>;

/// Word → translation map shared by all word tasks
///
/// Writes are single-key inserts under one lock; the last write to a key
/// wins. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct ResultStore {
    words: Mutex<HashMap<String, String>>,
}

impl ResultStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a translation
    ///
    /// # Returns
    ///
    /// `true` if a previous translation for the word was replaced
    pub fn put(&self, word: impl Into<String>, translation: impl Into<String>) -> bool {
        self.lock()
            .insert(word.into(), translation.into())
            .is_some()
    }

    /// Returns the stored translation for a word
    pub fn get(&self, word: &str) -> Option<String> {
        self.lock().get(word).cloned()
    }

    /// Number of stored words
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies the current content, sorted by word
    pub fn snapshot(&self) -> Snapshot {
        self.lock()
            .iter()
            .map(|(word, translation)| (word.clone(), translation.clone()))
            .collect()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned map is still safe to read and flush.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.words.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
