//! Error taxonomy for the consolidation run.
//!
//! Per-file problems (unparseable descriptor, missing field) are not errors
//! at this level: they are recorded in the run report and the run continues.
//! The variants here are the conditions that fail the run as a whole.

use std::path::PathBuf;
use thiserror::Error;

/// Run-level failures of the consolidation operation.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    /// The input directory contained no `query-*.json` files.
    #[error("no query files found in {dir}")]
    NoInputFiles { dir: PathBuf },

    /// The input directory could not be read at all.
    #[error("failed to read input directory {dir}")]
    InputDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two descriptor files derived the same identifier token.
    #[error("duplicate query identifier '{hash}' (from {first} and {second})")]
    DuplicateIdentifier {
        hash: String,
        first: String,
        second: String,
    },

    /// The aggregate output could not be serialized.
    #[error("failed to serialize aggregate output")]
    Serialize(#[from] serde_json::Error),

    /// The output file could not be written.
    #[error("failed to write output file {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
