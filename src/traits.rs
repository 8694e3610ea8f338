//! Common trait definitions
//!
//! Defines traits for dependency injection and testing: `FileStore` for
//! file output and `Clock` for the current instant. Production code uses
//! `StdFileStore` and `SystemClock`; tests substitute their own.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Trait for file system operations
///
/// Abstracts file I/O operations for dependency injection and testing.
/// Production code uses `StdFileStore`, tests can use mock implementations.
pub trait FileStore: Send + Sync {
    /// Write content to a file, replacing it if present
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Create directory
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Whether a file or directory exists at `path`
    fn exists(&self, path: &Path) -> bool;
}

/// Source of the current instant
///
/// Date helpers read "now" through this trait so that day-boundary logic
/// can be tested against a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
