//! Error types for the content scanner.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a scan operation.
///
/// Failures of a single file during a whole-tree scan are logged and skipped
/// instead; they only surface through [`ScanError`] when that file was
/// requested directly.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Reading a file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content or ignore pattern is not a valid glob
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Walking the file system for a pattern failed
    #[error("failed to walk files: {0}")]
    Walk(#[from] glob::GlobError),

    /// A custom file source failed
    #[error("file source failed: {0}")]
    Source(String),

    /// The change batching worker could not be started
    #[error("failed to start change watcher: {0}")]
    Watcher(#[source] std::io::Error),
}

pub type ScanResult<T> = Result<T, ScanError>;
