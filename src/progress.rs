//! Persisted reading progress
//!
//! One JSON record in the host's key-value store remembers where reading
//! stopped. Failures in either direction never interrupt reading: malformed
//! records read as absent, failed saves are logged and dropped.

use serde::{Deserialize, Serialize};

use crate::store::KeyValueStore;

/// Store key for the reading-progress record
pub const PROGRESS_KEY: &str = "pdfProgress";

/// Where reading stopped: the only persisted navigation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingProgress {
    /// 1-based page number
    pub page: usize,
    /// 0-based line index. Only meaningful relative to one layout of one
    /// document; re-validated against the detected line count after every
    /// render.
    pub line: usize,
}

impl ReadingProgress {
    #[must_use]
    pub const fn new(page: usize, line: usize) -> Self {
        Self { page, line }
    }
}

/// Loads saved progress. Absent records read as `None`; malformed records
/// do too, with a warning (the document may have been replaced, or the
/// store scribbled on).
pub fn load_progress(store: &dyn KeyValueStore) -> Option<ReadingProgress> {
    let raw = store.get(PROGRESS_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(progress) => Some(progress),
        Err(e) => {
            log::warn!("Ignoring malformed reading progress: {e}");
            None
        }
    }
}

/// Saves progress, logging and swallowing persistence failures.
pub fn save_progress(store: &mut dyn KeyValueStore, progress: ReadingProgress) {
    let payload = match serde_json::to_string(&progress) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Failed to encode reading progress: {e}");
            return;
        }
    };
    if let Err(e) = store.set(PROGRESS_KEY, &payload) {
        log::error!("Failed to save reading progress: {e:#}");
    }
}
