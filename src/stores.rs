//! Storage and clock implementations
//!
//! Provides the standard filesystem `FileStore` and the system and fixed
//! `Clock` implementations used by the date helpers and the log book.

use crate::traits::{Clock, FileStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Standard filesystem implementation
///
/// Implements the FileStore trait using the standard library's `std::fs` module.
pub struct StdFileStore;

impl FileStore for StdFileStore {
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content).with_context(|| format!("Failed to write to {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create directory {:?}", path))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Wall-clock time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Clock frozen at the given Unix timestamp in seconds
    ///
    /// Returns `None` if the timestamp is out of chrono's range.
    pub fn at_timestamp(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
