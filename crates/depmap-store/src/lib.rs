//! Depmap Storage Layer
//!
//! Implements the `ResultsStore` trait with one JSON document per finalized
//! session under a results directory.
//!
//! # Architecture
//!
//! - `results_<session-id>.json` holds the full [`ElicitationRecord`]
//! - A record on disk is the committed truth: saving the same session again
//!   returns the existing record unchanged, which makes finalize repeat-safe
//!
//! # Examples
//!
//! ```no_run
//! use depmap_store::JsonResultsStore;
//!
//! let store = JsonResultsStore::new("results").unwrap();
//! // Store is now ready to commit finalized sessions
//! ```

#![warn(missing_docs)]

use depmap_domain::traits::ResultsStore;
use depmap_domain::{ElicitationRecord, SessionId};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record encoding or decoding failed
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] serde_json::Error),
}

/// File-backed implementation of `ResultsStore`
///
/// Each committed session becomes one pretty-printed JSON document. Writes
/// go through a temporary file and rename so a crash never leaves a
/// half-written record behind.
pub struct JsonResultsStore {
    results_dir: PathBuf,
}

impl JsonResultsStore {
    /// Create a store rooted at the given directory, creating it if needed
    pub fn new<P: AsRef<Path>>(results_dir: P) -> Result<Self, StoreError> {
        let results_dir = results_dir.as_ref().to_path_buf();
        fs::create_dir_all(&results_dir)?;
        Ok(Self { results_dir })
    }

    /// Path of the document for a session
    pub fn record_path(&self, session_id: SessionId) -> PathBuf {
        self.results_dir.join(format!("results_{}.json", session_id))
    }

    fn read_record(&self, path: &Path) -> Result<ElicitationRecord, StoreError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl ResultsStore for JsonResultsStore {
    type Error = StoreError;

    fn save(&self, record: &ElicitationRecord) -> Result<ElicitationRecord, Self::Error> {
        let path = self.record_path(record.session_id);

        // First commit wins; repeated finalize returns the stored record
        if path.exists() {
            return self.read_record(&path);
        }

        let encoded = serde_json::to_string_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &path)?;

        Ok(record.clone())
    }

    fn load(&self, session_id: SessionId) -> Result<Option<ElicitationRecord>, Self::Error> {
        let path = self.record_path(session_id);
        if !path.exists() {
            return Ok(None);
        }
        self.read_record(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depmap_domain::{Pair, Respondent};

    fn record() -> ElicitationRecord {
        ElicitationRecord {
            session_id: SessionId::new(),
            respondent: Respondent {
                name: "Ada Lovelace".to_string(),
                position: "Analyst".to_string(),
                email: "ada@example.com".to_string(),
            },
            variables: vec!["Price".to_string(), "Demand".to_string()],
            dependencies: vec![Pair::new("Price", "Demand")],
            saved_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultsStore::new(dir.path()).unwrap();
        let record = record();

        let committed = store.save(&record).unwrap();
        assert_eq!(committed, record);

        let loaded = store.load(record.session_id).unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultsStore::new(dir.path()).unwrap();

        assert!(store.load(SessionId::new()).unwrap().is_none());
    }

    #[test]
    fn test_repeated_save_returns_first_commit() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonResultsStore::new(dir.path()).unwrap();

        let first = record();
        store.save(&first).unwrap();

        // A later save with a different timestamp must not overwrite
        let mut retry = first.clone();
        retry.saved_at = first.saved_at + 60;
        let committed = store.save(&retry).unwrap();

        assert_eq!(committed, first);
        assert_eq!(store.load(first.session_id).unwrap().unwrap(), first);
    }

    #[test]
    fn test_creates_results_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("results");
        let store = JsonResultsStore::new(&nested).unwrap();

        store.save(&record()).unwrap();
        assert!(nested.exists());
    }
}
