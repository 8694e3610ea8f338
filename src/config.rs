//! Configuration management
//!
//! Handles loading and saving the reference timezone, weekday names and
//! log settings used by the date helpers and the log book.
//!
//! Configuration files are stored in platform-specific directories:
//! - macOS: `~/Library/Application Support/sweetkit/config.yaml`
//! - Linux: `~/.config/sweetkit/config.yaml`
//! - Windows: `%APPDATA%\sweetkit\config.yaml`

use crate::logbook::LogBook;
use crate::stores::SystemClock;
use crate::utils::dates::{parse_offset, DateKit, DEFAULT_WEEKDAY_NAMES};
use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default reference timezone (China Standard Time)
pub const DEFAULT_REFERENCE_OFFSET: &str = "+08:00";

/// Application configuration
///
/// Persisted as YAML in the user's config directory. Missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    /// UTC offset used for every day-boundary computation, `+HH:MM`
    pub reference_offset: String,
    /// Weekday names, Monday first
    pub weekday_names: Vec<String>,
    pub log: LogSettings,
}

/// Log book settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Whether entries are recorded at all
    pub active: bool,
    /// Directory for saved logs; the platform cache dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            reference_offset: DEFAULT_REFERENCE_OFFSET.to_owned(),
            weekday_names: DEFAULT_WEEKDAY_NAMES.iter().map(|s| s.to_string()).collect(),
            log: LogSettings::default(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            active: cfg!(debug_assertions),
            directory: None,
        }
    }
}

impl KitConfig {
    /// Loads configuration from the default config file location
    ///
    /// # Returns
    /// - `Ok(KitConfig)` with the loaded configuration, or the defaults if the file doesn't exist
    /// - `Err` if the file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from an explicit path
    ///
    /// # Errors
    /// Returns an error if the file exists but is malformed, unreadable or
    /// fails validation.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: KitConfig =
            serde_yaml::from_str(&contents).with_context(|| "Failed to parse config file")?;
        config.validate()?;

        Ok(config)
    }

    /// Saves the configuration to the default config file location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration as YAML, creating parent directories
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Writes the default configuration to `path`
    ///
    /// The existing file is never read, so a malformed config can always be
    /// replaced.
    ///
    /// # Errors
    /// Returns an error if the file exists and `force` is false, or if it
    /// cannot be written.
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!("Config already exists at {:?}; pass --force to overwrite", path);
        }
        Self::default().save_to(path)
    }

    /// Returns the platform-specific configuration file path
    ///
    /// Falls back to `~/.config/sweetkit/config.yaml` if platform detection fails.
    ///
    /// # Errors
    /// Returns an error if the HOME environment variable is not set (fallback case only).
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "sweetkit") {
            Ok(proj_dirs.config_dir().join("config.yaml"))
        } else {
            let home = std::env::var("HOME").context("HOME not set")?;
            Ok(PathBuf::from(home).join(".config/sweetkit/config.yaml"))
        }
    }

    /// Checks the offset and the weekday table
    pub fn validate(&self) -> Result<()> {
        self.reference_timezone()?;
        if self.weekday_names.len() != 7 {
            bail!(
                "weekday_names must list 7 names, found {}",
                self.weekday_names.len()
            );
        }
        Ok(())
    }

    /// The parsed reference timezone
    pub fn reference_timezone(&self) -> Result<FixedOffset> {
        parse_offset(&self.reference_offset)
            .with_context(|| "Invalid reference_offset in config")
    }

    /// Builds a `DateKit` backed by the system clock
    pub fn date_kit(&self) -> Result<DateKit> {
        let offset = self.reference_timezone()?;
        let names: [String; 7] = self
            .weekday_names
            .clone()
            .try_into()
            .map_err(|names: Vec<String>| {
                anyhow::anyhow!("weekday_names must list 7 names, found {}", names.len())
            })?;
        Ok(DateKit::new(offset, names, Arc::new(SystemClock)))
    }

    /// Builds a `LogBook` honouring `log.active`
    pub fn log_book(&self) -> LogBook {
        LogBook::new(self.log.active)
    }

    /// Directory saved logs go to
    ///
    /// `log.directory` if set, otherwise the platform cache dir.
    pub fn log_directory(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.log.directory {
            return Ok(dir.clone());
        }
        if let Some(proj_dirs) = ProjectDirs::from("", "", "sweetkit") {
            Ok(proj_dirs.cache_dir().join("logs"))
        } else {
            let home = std::env::var("HOME").context("HOME not set")?;
            Ok(PathBuf::from(home).join(".cache/sweetkit/logs"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.reference_timezone().unwrap(),
            FixedOffset::east_opt(8 * 3600).unwrap()
        );
        assert!(config.date_kit().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = KitConfig::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, KitConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.yaml");

        let mut config = KitConfig::default();
        config.reference_offset = "-05:00".to_owned();
        config.log.active = true;
        config.log.directory = Some(dir.path().join("logs"));
        config.save_to(&path).unwrap();

        assert_eq!(KitConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "reference_offset: \"+00:00\"\n").unwrap();

        let config = KitConfig::load_from(&path).unwrap();
        assert_eq!(config.reference_offset, "+00:00");
        assert_eq!(config.weekday_names.len(), 7);
    }

    #[test]
    fn test_rejects_bad_weekday_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "weekday_names: [Mon, Tue]\n").unwrap();

        assert!(KitConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_write_default_replaces_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "reference_offset: Asia/Beijing\nweekday_names: [Mon]\n").unwrap();
        assert!(KitConfig::load_from(&path).is_err());

        assert!(KitConfig::write_default(&path, false).is_err());
        KitConfig::write_default(&path, true).unwrap();
        assert_eq!(KitConfig::load_from(&path).unwrap(), KitConfig::default());
    }

    #[test]
    fn test_rejects_named_timezone() {
        let config = KitConfig {
            reference_offset: "Asia/Beijing".to_owned(),
            ..KitConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(config.date_kit().is_err());
    }

    #[test]
    fn test_explicit_log_directory_wins() {
        let mut config = KitConfig::default();
        config.log.directory = Some(PathBuf::from("/tmp/sweetkit-logs"));
        assert_eq!(
            config.log_directory().unwrap(),
            PathBuf::from("/tmp/sweetkit-logs")
        );
    }
}
