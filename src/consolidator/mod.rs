//! The consolidation operation itself.
//!
//! Reads every descriptor the scanner found, skips the ones that cannot be
//! parsed, and writes the aggregate `sqlx-data.json` in one atomic step.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::ConsolidateError;
use crate::models::{ConsolidationReport, QueryDescriptor, QueryEntry, SkippedFile, SqlxData};
use crate::scanner;

/// Settings for one consolidation run.
#[derive(Debug, Clone)]
pub struct ConsolidateOptions {
    /// Directory containing `query-*.json` descriptors.
    pub input_dir: PathBuf,
    /// Path the aggregate file is written to.
    pub output_path: PathBuf,
    /// Database dialect tag for the `db` field.
    pub db_tag: String,
}

/// Consolidates all descriptors in `options.input_dir` into one aggregate
/// file at `options.output_path`.
///
/// Per-file failures (unparseable JSON, missing `query` or `describe`) are
/// logged, recorded in the report, and skipped; one bad descriptor must not
/// abort the run. The output is fully regenerated on every run, never merged
/// with prior content.
pub fn consolidate(options: &ConsolidateOptions) -> Result<ConsolidationReport, ConsolidateError> {
    let files = scanner::find_descriptor_files(&options.input_dir)?;
    info!("Found {} query files", files.len());

    let (entries, skipped) = collect_entries(&files)?;

    let mut data = SqlxData::new(options.db_tag.clone());
    data.queries = entries;

    let output_bytes = write_aggregate(&data, &options.output_path)?;

    Ok(ConsolidationReport {
        files_found: files.len(),
        included: data.queries.len(),
        skipped,
        output_bytes,
    })
}

/// Parses the given descriptor files into output entries, in input order.
///
/// Unparseable descriptors land in the skip list; a repeated identifier
/// token fails the whole run.
fn collect_entries(
    files: &[PathBuf],
) -> Result<(Vec<QueryEntry>, Vec<SkippedFile>), ConsolidateError> {
    let mut entries: Vec<QueryEntry> = Vec::new();
    let mut skipped = Vec::new();

    for path in files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // The scanner only yields matching filenames, so derivation cannot
        // fail here; the guard keeps the invariant local.
        let Some(hash) = scanner::derive_identifier(&filename) else {
            continue;
        };

        let descriptor = match read_descriptor(path) {
            Ok(d) => d,
            Err(reason) => {
                warn!("Skipping {}: {}", filename, reason);
                skipped.push(SkippedFile { filename, reason });
                continue;
            }
        };

        if let Some(prev) = entries.iter().find(|e| e.hash == hash) {
            return Err(ConsolidateError::DuplicateIdentifier {
                hash: hash.to_string(),
                first: format!("query-{}.json", prev.hash),
                second: filename,
            });
        }

        debug!("Adding query {}: {}", hash, preview(&descriptor.query));
        entries.push(QueryEntry {
            hash: hash.to_string(),
            query: descriptor.query,
            describe: descriptor.describe,
        });
    }

    Ok((entries, skipped))
}

/// Reads and parses a single descriptor, returning the failure reason as a
/// plain string since it only feeds the report and the warning log.
fn read_descriptor(path: &Path) -> Result<QueryDescriptor, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("unreadable: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("invalid descriptor: {}", e))
}

/// Serializes the aggregate and writes it via a temp file in the output
/// directory, renamed into place so an interrupted run never leaves a
/// truncated `sqlx-data.json`.
fn write_aggregate(data: &SqlxData, output_path: &Path) -> Result<u64, ConsolidateError> {
    let json = serde_json::to_vec_pretty(data)?;

    let dir = match output_path.parent() {
        Some(p) if p != Path::new("") => p,
        _ => Path::new("."),
    };

    let write_err = |source: std::io::Error| ConsolidateError::OutputWrite {
        path: output_path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&json).map_err(write_err)?;
    tmp.persist(output_path).map_err(|e| write_err(e.error))?;

    Ok(json.len() as u64)
}

/// First line of a SQL statement, truncated for log output.
fn preview(query: &str) -> String {
    let first_line = query.lines().next().unwrap_or("");
    if first_line.chars().count() > 50 {
        let truncated: String = first_line.chars().take(50).collect();
        format!("{}...", truncated)
    } else {
        first_line.to_string()
    }
}
