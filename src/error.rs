//! Error types for par2-repair
//!
//! These errors are internal plumbing. The orchestration pipeline absorbs
//! every one of them at a defined stage (empty candidate set, unsuppressed
//! output, invalid-arguments status), so no `Error` ever crosses the public
//! boundary — callers always receive a [`crate::RepairOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for par2-repair internal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for fallible pipeline stages
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (directory scan, discard-destination setup)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path cannot be marshalled across the engine boundary
    #[error("invalid path {}: {reason}", .path.display())]
    InvalidPath {
        /// The path that could not be marshalled
        path: PathBuf,
        /// The reason the path is invalid (e.g., interior NUL byte)
        reason: String,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_includes_source_message() {
        let err = Error::from(std::io::Error::other("scan failed"));
        assert!(err.to_string().contains("scan failed"));
    }

    #[test]
    fn invalid_path_display_includes_path_and_reason() {
        let err = Error::InvalidPath {
            path: PathBuf::from("/downloads/bad\u{0}name"),
            reason: "interior NUL byte".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid path"));
        assert!(msg.contains("interior NUL byte"));
    }
}
