//! Custom error types for SkGuard.
//!
//! Provides a structured error hierarchy for better error handling
//! and more informative error messages.

use std::path::PathBuf;

/// The main error type for SkGuard operations.
#[derive(Debug, thiserror::Error)]
pub enum SkGuardError {
    /// The scan target does not exist. Fatal to the scan call.
    #[error("target path does not exist: {0:?}")]
    InvalidTarget(PathBuf),

    /// I/O error (file read/write, permissions, etc.)
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// The signature source (feed cache file, remote snapshot) could not
    /// supply a usable signature set. Callers are expected to fall back to
    /// the built-in set before invoking a scan; `scan` itself never retries.
    #[error("signature source unavailable: {0}")]
    SignatureSource(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persistence store error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias using SkGuardError
pub type SkGuardResult<T> = Result<T, SkGuardError>;

impl SkGuardError {
    /// Create an I/O error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convert from raw I/O errors (without path context)
impl From<std::io::Error> for SkGuardError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }
}
