//! In-memory log book
//!
//! Accumulates leveled log lines in two buffers: a plain one
//! (`"💙 INFO message"`) and a detailed one that also records the call
//! site. Every entry is mirrored to `tracing`. The detailed buffer can be
//! saved to a file through a [`FileStore`].

use crate::traits::FileStore;
use crate::utils::validation::build_safe_filepath;
use anyhow::Result;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// Prefix written in front of each message
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Error => "❌ ERROR",
            LogLevel::Warning => "⚠️ WARNING",
            LogLevel::Info => "💙 INFO",
            LogLevel::Debug => "💚 DEBUG",
        }
    }
}

#[derive(Default)]
struct Buffers {
    logged: String,
    detailed: String,
}

/// Thread-safe log accumulator
pub struct LogBook {
    active: AtomicBool,
    buffers: Mutex<Buffers>,
}

impl LogBook {
    pub fn new(active: bool) -> Self {
        Self {
            active: AtomicBool::new(active),
            buffers: Mutex::new(Buffers::default()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Turns recording on or off; existing entries are kept
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    fn buffers(&self) -> MutexGuard<'_, Buffers> {
        // A panic mid-append leaves at worst a partial line
        self.buffers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.record(LogLevel::Error, message, Location::caller());
    }

    #[track_caller]
    pub fn warning(&self, message: impl Display) {
        self.record(LogLevel::Warning, message, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.record(LogLevel::Info, message, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.record(LogLevel::Debug, message, Location::caller());
    }

    /// Appends one entry for `level` attributed to `location`
    pub fn record(&self, level: LogLevel, message: impl Display, location: &Location<'_>) {
        if !self.is_active() {
            return;
        }

        let mut line = format!("{} {}", level.label(), message);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        let file = Path::new(location.file())
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_else(|| location.file());
        let detailed = format!("{}:{}: {}", file, location.line(), line);

        let text = line.trim_end();
        match level {
            LogLevel::Error => error!(file, line = location.line(), "{}", text),
            LogLevel::Warning => warn!(file, line = location.line(), "{}", text),
            LogLevel::Info => info!(file, line = location.line(), "{}", text),
            LogLevel::Debug => debug!(file, line = location.line(), "{}", text),
        }

        let mut buffers = self.buffers();
        buffers.logged.push_str(&line);
        buffers.detailed.push_str(&detailed);
    }

    /// The plain log text
    pub fn logged(&self) -> String {
        self.buffers().logged.clone()
    }

    /// The log text with call sites
    pub fn detailed(&self) -> String {
        self.buffers().detailed.clone()
    }

    /// Empties both buffers
    pub fn clear(&self) {
        let mut buffers = self.buffers();
        buffers.logged.clear();
        buffers.detailed.clear();
    }

    /// Writes the detailed log to `dir/filename`, replacing any existing file
    ///
    /// The filename is sanitized and the directory created if needed.
    ///
    /// # Returns
    /// The path written to
    pub fn save(&self, store: &dyn FileStore, dir: &Path, filename: &str) -> Result<PathBuf> {
        store.create_dir_all(dir)?;
        let path = build_safe_filepath(dir, filename);
        if store.exists(&path) {
            store.remove_file(&path)?;
        }
        store.write(&path, &self.detailed())?;
        Ok(path)
    }
}

/// `<date> <time>.log` for the given instant
pub fn default_filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("{}.log", now.format("%Y-%m-%d %H:%M:%S%.3f"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::StdFileStore;
    use std::sync::Arc;

    #[derive(Default)]
    struct MemoryStore {
        files: Mutex<std::collections::HashMap<PathBuf, String>>,
        dirs: Mutex<Vec<PathBuf>>,
    }

    impl FileStore for MemoryStore {
        fn write(&self, path: &Path, content: &str) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_owned());
            Ok(())
        }

        fn create_dir_all(&self, path: &Path) -> Result<()> {
            self.dirs.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }

        fn remove_file(&self, path: &Path) -> Result<()> {
            self.files.lock().unwrap().remove(path);
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
    }

    #[test]
    fn test_records_labelled_lines() {
        let log = LogBook::new(true);
        log.info("started");
        log.error("failed\n");

        assert_eq!(log.logged(), "💙 INFO started\n❌ ERROR failed\n");
        let detailed = log.detailed();
        assert!(detailed.starts_with("logbook:"));
        assert!(detailed.contains(": 💙 INFO started\n"));
        assert_eq!(detailed.lines().count(), 2);
    }

    #[test]
    fn test_inactive_book_records_nothing() {
        let log = LogBook::new(false);
        log.warning("ignored");
        assert_eq!(log.logged(), "");

        log.set_active(true);
        log.debug("kept");
        assert_eq!(log.logged(), "💚 DEBUG kept\n");
    }

    #[test]
    fn test_clear() {
        let log = LogBook::new(true);
        log.info("x");
        log.clear();
        assert_eq!(log.logged(), "");
        assert_eq!(log.detailed(), "");
    }

    #[test]
    fn test_concurrent_appends_keep_every_line() {
        let log = Arc::new(LogBook::new(true));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        log.info(format!("{}-{}", i, j));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(log.logged().lines().count(), 100);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let store = MemoryStore::default();
        let dir = Path::new("/logs");
        store.write(&dir.join("run.log"), "old").unwrap();

        let log = LogBook::new(true);
        log.info("new");
        let path = log.save(&store, dir, "run.log").unwrap();

        assert_eq!(path, dir.join("run.log"));
        let files = store.files.lock().unwrap();
        assert!(files[&path].contains("💙 INFO new"));
        assert_eq!(store.dirs.lock().unwrap().as_slice(), &[dir.to_path_buf()]);
    }

    #[test]
    fn test_save_sanitizes_timestamp_filename() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log = LogBook::new(true);
        log.info("to disk");

        let now = DateTime::from_timestamp(0, 0).unwrap();
        let filename = default_filename(&now);
        assert_eq!(filename, "1970-01-01 00:00:00.000.log");

        let path = log
            .save(&StdFileStore, &temp_dir.path().join("logs"), &filename)
            .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "1970-01-01 00_00_00.000.log"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("💙 INFO to disk"));
    }
}
