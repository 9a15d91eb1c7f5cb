//! Error types for feed ingestion.

use feed_fetch::{FetchError, FetchErrorKind};
use feed_model::Delimiter;
use thiserror::Error;

/// Header/delimiter resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Nothing but blank lines at or after the configured header row.
    #[error("no header line found at or after line {header_row}")]
    NoHeader { header_row: usize },

    /// No candidate split the header into more than one field.
    #[error(
        "no delimiter split header line {line} into more than one field (tried {})",
        format_delimiters(.attempted)
    )]
    NoDelimiterDetected {
        attempted: Vec<Delimiter>,
        line: usize,
    },
}

/// Row materialization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    /// No row survived skipping and pruning.
    #[error("no rows left ({data_lines} data lines, {skipped_lines} skipped)")]
    EmptyResult {
        data_lines: usize,
        skipped_lines: usize,
    },

    /// Only one column survived, which means the delimiter was misdetected.
    #[error("only one column ('{column}') left after normalization")]
    SingleColumn { column: String },
}

/// Flat classification of an [`IngestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestErrorKind {
    Unreachable,
    Timeout,
    HttpStatus,
    Client,
    Decode,
    NoHeader,
    NoDelimiterDetected,
    EmptyResult,
    SingleColumn,
}

/// Errors that can occur while ingesting a feed.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The bytes could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The bytes could not be turned into text.
    #[error("failed to decode '{resource}': {message}")]
    Decode { resource: String, message: String },

    /// Header/delimiter resolution failed.
    #[error("failed to resolve schema of '{resource}': {source}")]
    Schema {
        resource: String,
        #[source]
        source: SchemaError,
    },

    /// Row materialization failed.
    #[error("failed to materialize '{resource}': {source}")]
    Materialize {
        resource: String,
        #[source]
        source: MaterializeError,
    },
}

impl IngestError {
    #[must_use]
    pub fn kind(&self) -> IngestErrorKind {
        match self {
            Self::Fetch(err) => match err.kind() {
                FetchErrorKind::Unreachable => IngestErrorKind::Unreachable,
                FetchErrorKind::Timeout => IngestErrorKind::Timeout,
                FetchErrorKind::Status => IngestErrorKind::HttpStatus,
                FetchErrorKind::Client => IngestErrorKind::Client,
            },
            Self::Decode { .. } => IngestErrorKind::Decode,
            Self::Schema { source, .. } => match source {
                SchemaError::NoHeader { .. } => IngestErrorKind::NoHeader,
                SchemaError::NoDelimiterDetected { .. } => IngestErrorKind::NoDelimiterDetected,
            },
            Self::Materialize { source, .. } => match source {
                MaterializeError::EmptyResult { .. } => IngestErrorKind::EmptyResult,
                MaterializeError::SingleColumn { .. } => IngestErrorKind::SingleColumn,
            },
        }
    }

    /// Returns whether the failure is transient (source unreachable) and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(err) => err.is_retryable(),
            Self::Decode { .. } | Self::Schema { .. } | Self::Materialize { .. } => false,
        }
    }

    /// Returns whether the source content itself is malformed.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::Schema { .. } | Self::Materialize { .. }
        )
    }

    /// Name of the resource that failed, when known.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::Fetch(err) => err.resource(),
            Self::Decode { resource, .. }
            | Self::Schema { resource, .. }
            | Self::Materialize { resource, .. } => Some(resource),
        }
    }
}

fn format_delimiters(delimiters: &[Delimiter]) -> String {
    delimiters
        .iter()
        .map(|d| format!("'{d}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
