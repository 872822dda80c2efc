//! Input file collection

use crate::error::SyncError;
use std::collections::HashSet;
use std::path::PathBuf;

/// Expands glob `patterns` into the files they match.
///
/// Files come out in expansion order, each once even when several patterns
/// match it. Directories are skipped; a pattern matching nothing adds nothing.
pub fn collect_files<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>, SyncError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = glob::glob(pattern).map_err(|source| SyncError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        for entry in entries {
            let path = entry.map_err(|err| SyncError::Read {
                path: err.path().to_path_buf(),
                source: err.into(),
            })?;
            if path.is_file() && seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}
