//! Candidate data file discovery
//!
//! Obfuscated Usenet downloads frequently carry filenames that do not match
//! the names recorded in the parity set. The engine can still match file
//! content by hash, but only for files it is told about: every non-parity
//! file in the directory must be offered as a candidate or hash-based
//! recovery of misnamed files silently fails.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Case-insensitive substring identifying parity files
const PARITY_EXTENSION: &str = ".par2";

/// OS metadata artifacts that are never repair candidates
const METADATA_NAMES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// Collect the candidate file set for a repair run
///
/// Reads `base_dir` once and returns every regular file whose name does not
/// contain the parity extension (case-insensitive) and is not an OS metadata
/// artifact. Order is implementation-defined; only membership matters.
///
/// An unreadable or missing directory yields an empty set, not an error: the
/// pipeline continues and lets the engine report insufficiency downstream.
#[must_use]
pub fn candidate_files(base_dir: &Path) -> Vec<PathBuf> {
    match scan_dir(base_dir) {
        Ok(files) => {
            debug!(
                base_dir = %base_dir.display(),
                candidates = files.len(),
                "collected candidate files"
            );
            files
        }
        Err(e) => {
            warn!(
                base_dir = %base_dir.display(),
                error = %e,
                "candidate scan failed, continuing with empty set"
            );
            Vec::new()
        }
    }
}

fn scan_dir(base_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(base_dir)? {
        let entry = entry?;

        // A single unreadable entry should not void the whole scan
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let name = entry.file_name();
        if is_candidate_name(&name.to_string_lossy()) {
            files.push(entry.path());
        }
    }

    Ok(files)
}

/// Whether a file name belongs in the candidate set
fn is_candidate_name(name: &str) -> bool {
    if name.to_ascii_lowercase().contains(PARITY_EXTENSION) {
        return false;
    }
    if METADATA_NAMES.iter().any(|m| m.eq_ignore_ascii_case(name)) {
        return false;
    }
    true
}
