//! Errors raised while producing raw edges.

use std::path::PathBuf;

/// Errors raised while producing raw edges.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The locator points at nothing.
    #[error("extraction source not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },

    /// An edge file is not a JSON array of raw edges.
    #[error("invalid edge file {}: {source}", path.display())]
    EdgeFile {
        /// The edge file.
        path: PathBuf,
        /// The JSON error.
        source: serde_json::Error,
    },

    /// A tsconfig file could not be parsed.
    #[error("invalid tsconfig {}: {source}", path.display())]
    TsConfig {
        /// The tsconfig file.
        path: PathBuf,
        /// The JSON error, after comments were stripped.
        source: serde_json::Error,
    },

    /// Directory traversal failed.
    #[error("failed to walk project: {0}")]
    Walk(#[from] ignore::Error),

    /// The blocking scan task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
