//! Error types for batch output.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while writing a table.
#[derive(Debug, Error)]
pub enum OutputError {
    /// A partition key, value or dataset name cannot be used as a path segment.
    #[error("invalid partition segment '{segment}': {reason}")]
    InvalidPartition { segment: String, reason: &'static str },

    /// Directory creation or file write failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table could not be converted or encoded as Parquet.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    /// The table could not be encoded as JSON.
    #[error("failed to encode {path} as JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
