//! sqlxdata - SQLx offline query-metadata consolidator
//!
//! A CLI tool that merges the individual query-<hash>.json descriptor files
//! in a .sqlx directory into the single sqlx-data.json aggregate consumed at
//! build time.
//!
//! Exit codes:
//!   0 - Success (aggregate written; skipped descriptors are non-fatal)
//!   1 - Runtime error (write failure, duplicate identifier, bad config)
//!   2 - No query files found in the input directory

mod cli;
mod config;
mod consolidator;
mod error;
mod models;
mod scanner;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use consolidator::ConsolidateOptions;
use error::ConsolidateError;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("sqlxdata v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Consolidation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .sqlxdata.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".sqlxdata.toml");

    if path.exists() {
        eprintln!("⚠️  .sqlxdata.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .sqlxdata.toml")?;

    println!("✅ Created .sqlxdata.toml with default settings.");
    println!("   Edit it to customize paths and the database tag.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the consolidation workflow. Returns the process exit code.
fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let options = ConsolidateOptions {
        input_dir: config.paths.input_dir.clone(),
        output_path: config.paths.output.clone(),
        db_tag: config.output.db.clone(),
    };

    if args.dry_run {
        return handle_dry_run(&options);
    }

    println!(
        "🔄 Creating {} from query metadata...",
        options.output_path.display()
    );

    let report = match consolidator::consolidate(&options) {
        Ok(report) => report,
        Err(ConsolidateError::NoInputFiles { dir }) => {
            eprintln!("❌ No query files found in {}", dir.display());
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };

    println!("📁 Found {} query files", report.files_found);

    if !report.skipped.is_empty() {
        for skip in &report.skipped {
            println!("⚠️  Skipped {}: {}", skip.filename, skip.reason);
        }
        warn!(
            "{} of {} descriptors were skipped",
            report.skipped.len(),
            report.files_found
        );
    }

    println!(
        "✅ Created {} with {} queries",
        options.output_path.display(),
        report.included
    );
    println!("📄 File size: {}", report.human_size());

    Ok(0)
}

/// Handle --dry-run: list matched descriptors and identifiers, write nothing.
fn handle_dry_run(options: &ConsolidateOptions) -> Result<i32> {
    println!("\n🔍 Dry run: scanning {} (no output written)...\n", options.input_dir.display());

    let files = match scanner::find_descriptor_files(&options.input_dir) {
        Ok(files) => files,
        Err(ConsolidateError::NoInputFiles { dir }) => {
            eprintln!("❌ No query files found in {}", dir.display());
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };

    println!("   Found {} descriptors that would be consolidated:\n", files.len());
    for file in &files {
        let name = file.file_name().unwrap_or_default().to_string_lossy();
        let hash = scanner::derive_identifier(&name).unwrap_or("?");
        println!("     📄 {} (hash: {})", name, hash);
    }
    println!("\n✅ Dry run complete. No files were written.");

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .sqlxdata.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
