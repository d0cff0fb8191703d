//! Discovery of per-query descriptor files.
//!
//! This module owns the two filename rules everything else relies on:
//! which files in the input directory count as descriptors, and how a
//! descriptor's identifier token is derived from its filename.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::ConsolidateError;

/// Filename prefix every descriptor carries.
const DESCRIPTOR_PREFIX: &str = "query-";
/// Filename suffix every descriptor carries.
const DESCRIPTOR_SUFFIX: &str = ".json";

/// Returns true if `filename` matches the `query-*.json` descriptor pattern.
///
/// Matching is case-sensitive and exact; a file named `Query-x.json` or
/// `query-x.JSON` is simply not a descriptor and is never reported as
/// malformed.
pub fn is_descriptor_filename(filename: &str) -> bool {
    filename.starts_with(DESCRIPTOR_PREFIX)
        && filename.ends_with(DESCRIPTOR_SUFFIX)
        && filename.len() > DESCRIPTOR_PREFIX.len() + DESCRIPTOR_SUFFIX.len()
}

/// Derives the identifier token from a descriptor filename.
///
/// `query-<token>.json` yields `<token>`. Returns `None` for filenames that
/// do not match the descriptor pattern. The token is a content hash computed
/// upstream; it is treated here as an opaque string.
pub fn derive_identifier(filename: &str) -> Option<&str> {
    if !is_descriptor_filename(filename) {
        return None;
    }
    Some(&filename[DESCRIPTOR_PREFIX.len()..filename.len() - DESCRIPTOR_SUFFIX.len()])
}

/// Enumerates descriptor files in `input_dir`, sorted by filename.
///
/// The scan is non-recursive: descriptors live directly in the `.sqlx`
/// directory, never in subdirectories. Lexicographic order makes the
/// aggregate output reproducible across runs, so its diff stays minimal.
pub fn find_descriptor_files(input_dir: &Path) -> Result<Vec<PathBuf>, ConsolidateError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(input_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ConsolidateError::InputDir {
            dir: input_dir.to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk error")),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if is_descriptor_filename(&name) {
            files.push(entry.into_path());
        } else {
            debug!("Ignoring non-descriptor file: {}", name);
        }
    }

    files.sort();

    if files.is_empty() {
        return Err(ConsolidateError::NoInputFiles {
            dir: input_dir.to_path_buf(),
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_derive_identifier() {
        assert_eq!(derive_identifier("query-abc123.json"), Some("abc123"));
        assert_eq!(
            derive_identifier("query-0f3a99c1d2.json"),
            Some("0f3a99c1d2")
        );
    }

    #[test]
    fn test_derive_identifier_rejects_non_descriptors() {
        assert_eq!(derive_identifier("query-abc.txt"), None);
        assert_eq!(derive_identifier("stmt-abc.json"), None);
        assert_eq!(derive_identifier("Query-abc.json"), None);
        assert_eq!(derive_identifier("query-.json"), None);
        assert_eq!(derive_identifier("sqlx-data.json"), None);
    }

    #[test]
    fn test_find_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("query-bbb.json"), "{}").unwrap();
        fs::write(dir.path().join("query-aaa.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("query-ccc.txt"), "").unwrap();

        let files = find_descriptor_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["query-aaa.json", "query-bbb.json"]);
    }

    #[test]
    fn test_find_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("query-top.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("query-deep.json"), "{}").unwrap();

        let files = find_descriptor_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("query-top.json"));
    }

    #[test]
    fn test_find_empty_dir_is_no_input_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_descriptor_files(dir.path()).unwrap_err();
        assert!(matches!(err, ConsolidateError::NoInputFiles { .. }));
    }
}
