//! Data models for the metadata consolidator.
//!
//! This module contains the serde structures for the per-query input
//! descriptors, the aggregate `sqlx-data.json` output, and the run report.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Database dialect tag written into the aggregate output.
///
/// This is a fixed property of the toolchain that produced the descriptors,
/// not something derived from the input files.
pub const DEFAULT_DB_TAG: &str = "PostgreSQL";

/// One per-query descriptor as read from `.sqlx/query-<hash>.json`.
///
/// Only `query` and `describe` are required; any extra fields the upstream
/// tool writes are ignored rather than rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDescriptor {
    /// The literal SQL statement text.
    pub query: String,
    /// Parameter and result-column type schema. Opaque to this tool:
    /// it is copied into the output without inspection.
    pub describe: Value,
}

/// One entry in the aggregate `queries` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryEntry {
    /// Identifier token taken from the descriptor's filename.
    ///
    /// The field is named `hash` for compatibility with the consuming
    /// toolchain; this tool never computes or verifies it.
    pub hash: String,
    /// SQL statement text, copied verbatim from the descriptor.
    pub query: String,
    /// Type schema, copied verbatim from the descriptor.
    pub describe: Value,
}

/// The aggregate output structure, serialized to `sqlx-data.json`.
///
/// Field order matters for stable output: `db` first, then `queries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlxData {
    /// Target database dialect tag.
    pub db: String,
    /// Consolidated entries, in sorted-filename order.
    pub queries: Vec<QueryEntry>,
}

impl SqlxData {
    /// Creates an empty aggregate for the given dialect tag.
    pub fn new(db: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            queries: Vec::new(),
        }
    }
}

/// A descriptor that was skipped during consolidation, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    /// Filename of the skipped descriptor (not the full path).
    pub filename: String,
    /// Human-readable reason (parse error, missing field, unreadable).
    pub reason: String,
}

/// Outcome of a consolidation run.
#[derive(Debug, Clone)]
pub struct ConsolidationReport {
    /// Number of descriptor files matched in the input directory.
    pub files_found: usize,
    /// Number of entries written to the aggregate output.
    pub included: usize,
    /// Descriptors skipped due to per-file errors.
    pub skipped: Vec<SkippedFile>,
    /// Size of the written output file in bytes.
    pub output_bytes: u64,
}

impl ConsolidationReport {
    /// Formats the output size the way the console summary reports it:
    /// whole kilobytes above 1 KiB, raw bytes below.
    pub fn human_size(&self) -> String {
        if self.output_bytes > 1024 {
            format!("{}KB", self.output_bytes / 1024)
        } else {
            format!("{}B", self.output_bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_ignores_extra_fields() {
        let raw = r#"{"query":"SELECT 1","describe":{"columns":[]},"extra":true}"#;
        let desc: QueryDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(desc.query, "SELECT 1");
        assert_eq!(desc.describe, json!({"columns": []}));
    }

    #[test]
    fn test_descriptor_missing_field_is_error() {
        let raw = r#"{"query":"SELECT 1"}"#;
        assert!(serde_json::from_str::<QueryDescriptor>(raw).is_err());
    }

    #[test]
    fn test_aggregate_field_order() {
        let mut data = SqlxData::new(DEFAULT_DB_TAG);
        data.queries.push(QueryEntry {
            hash: "abc".to_string(),
            query: "SELECT 1".to_string(),
            describe: json!({}),
        });

        let out = serde_json::to_string(&data).unwrap();
        // db must serialize before queries, hash before query before describe
        assert_eq!(
            out,
            r#"{"db":"PostgreSQL","queries":[{"hash":"abc","query":"SELECT 1","describe":{}}]}"#
        );
    }

    #[test]
    fn test_human_size() {
        let mut report = ConsolidationReport {
            files_found: 1,
            included: 1,
            skipped: Vec::new(),
            output_bytes: 512,
        };
        assert_eq!(report.human_size(), "512B");

        report.output_bytes = 4096;
        assert_eq!(report.human_size(), "4KB");
    }
}
