//! Catalog error types.

use std::path::PathBuf;

/// Errors that can occur while building, saving or loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// An archive name does not follow its family's naming convention.
    #[error("cannot classify '{filename}' as {family}: expected {pattern}")]
    Classification {
        filename: String,
        family: String,
        pattern: String,
    },

    /// Reading an archive to compute its digest failed.
    #[error("checksum failed for {path}: {source}")]
    Checksum {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking a family directory failed.
    #[error("scan error at {path}: {detail}")]
    Scan { path: PathBuf, detail: String },

    /// A family pattern in the registry does not compile.
    #[error("invalid pattern for {family}: {source}")]
    InvalidPattern {
        family: String,
        #[source]
        source: regex::Error,
    },

    /// The snapshot digest does not match its contents.
    #[error("snapshot integrity check failed for {path}: expected {expected}, got {actual}")]
    SnapshotIntegrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The snapshot parsed but describes an impossible catalog.
    #[error("invalid snapshot: {detail}")]
    InvalidSnapshot { detail: String },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
