//! Error types for descriptors and catalogs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a descriptor catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog content is not valid TOML or has the wrong shape.
    #[error("failed to parse catalog {origin}: {message}")]
    Parse { origin: String, message: String },

    /// Two descriptors share the same name.
    #[error("duplicate source name '{name}' in catalog")]
    DuplicateName { name: String },

    /// Descriptor failed validation.
    #[error("invalid source '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    /// Encoding label not recognized by `encoding_rs`.
    #[error("unknown encoding '{label}' for source '{name}'")]
    UnknownEncoding { name: String, label: String },

    /// Delimiter text is neither a single ASCII character nor `whitespace`.
    #[error("invalid delimiter '{value}' for source '{name}'")]
    InvalidDelimiter { name: String, value: String },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
