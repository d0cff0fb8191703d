//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// sqlxdata - consolidate SQLx per-query metadata into sqlx-data.json
///
/// Scans a directory of query-<hash>.json descriptor files produced by the
/// query-checking toolchain and merges them into the single aggregate file
/// consumed at build time.
///
/// Examples:
///   sqlxdata
///   sqlxdata --input-dir backend/.sqlx --output backend/sqlx-data.json
///   sqlxdata --dry-run
///   sqlxdata --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing query-*.json descriptor files
    ///
    /// Defaults to .sqlx in the current directory. Can also be set via
    /// SQLXDATA_INPUT_DIR or the [paths] section of .sqlxdata.toml.
    #[arg(short, long, value_name = "DIR", env = "SQLXDATA_INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Output path for the aggregate file
    ///
    /// Defaults to sqlx-data.json in the current directory.
    #[arg(short, long, value_name = "FILE", env = "SQLXDATA_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Database dialect tag written into the "db" field
    ///
    /// Defaults to PostgreSQL. The consuming toolchain matches this against
    /// the database driver in use.
    #[arg(long, value_name = "TAG")]
    pub db: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .sqlxdata.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List matched descriptors and derived identifiers without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .sqlxdata.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref db) = self.db {
            if db.trim().is_empty() {
                return Err("Database tag must not be empty".to_string());
            }
        }

        if let Some(ref input_dir) = self.input_dir {
            if input_dir.exists() && !input_dir.is_dir() {
                return Err(format!(
                    "Input path is not a directory: {}",
                    input_dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input_dir: None,
            output: None,
            db: None,
            config: None,
            dry_run: false,
            init_config: false,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_validation_defaults_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_db_tag() {
        let mut args = make_args();
        args.db = Some("  ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
