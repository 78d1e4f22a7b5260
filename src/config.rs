//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (HALO_EXPORT_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [export]
//! download_dir = "/home/me/Downloads"
//! save_mode = "staged"
//! default_schema = "reduced"
//! default_filename = "subhalos.csv"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! HALO_EXPORT_EXPORT__DOWNLOAD_DIR=/custom/path
//! HALO_EXPORT_EXPORT__SAVE_MODE=direct
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::schema::SchemaKind;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "HALO_EXPORT_";

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Export target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory that receives exported files
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Which save mechanism to use (auto, direct, staged)
    #[serde(default)]
    pub save_mode: SaveMode,

    /// In auto mode, prefer the legacy direct-save path when available
    #[serde(default)]
    pub legacy_direct_save: bool,

    /// Schema used when the caller does not pick one
    #[serde(default)]
    pub default_schema: SchemaKind,

    /// Suggested file name when the caller does not supply one
    #[serde(default = "default_filename")]
    pub default_filename: String,
}

/// Save mechanism selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Detect from the environment
    #[default]
    Auto,
    /// Write straight to the target name
    Direct,
    /// Write a transient hidden file, then move it into place
    Staged,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}
fn default_filename() -> String {
    "halos.csv".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. config.toml (base configuration)
    /// 2. config.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (HALO_EXPORT_* prefix)
    ///
    /// Missing files are skipped; a file that exists but does not parse is
    /// an error.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from_dir(Path::new("."))
    }

    /// Same merge order as [`Config::load`], with both files looked up in `dir`
    pub fn load_from_dir(dir: &Path) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(dir.join("config.toml")))
            .merge(Toml::file(dir.join("config.local.toml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Load configuration from specific file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            download_dir: default_download_dir(),
            save_mode: SaveMode::Auto,
            legacy_direct_save: false,
            default_schema: SchemaKind::Extended,
            default_filename: default_filename(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
