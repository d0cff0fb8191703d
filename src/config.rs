//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.sqlxdata.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::DEFAULT_DB_TAG;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input and output paths.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Output content settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Filesystem paths for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory scanned for query-*.json descriptors.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Path the aggregate file is written to.
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output: default_output(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(".sqlx")
}

fn default_output() -> PathBuf {
    PathBuf::from("sqlx-data.json")
}

/// Settings that shape the aggregate file's content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Database dialect tag for the "db" field.
    #[serde(default = "default_db")]
    pub db: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { db: default_db() }
    }
}

fn default_db() -> String {
    DEFAULT_DB_TAG.to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".sqlxdata.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only values
    /// the user explicitly provided override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input_dir) = args.input_dir {
            self.paths.input_dir = input_dir.clone();
        }
        if let Some(ref output) = args.output {
            self.paths.output = output.clone();
        }
        if let Some(ref db) = args.db {
            self.output.db = db.clone();
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
