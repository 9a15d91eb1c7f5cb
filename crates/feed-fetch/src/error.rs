//! Error types for resource fetching.

use std::time::Duration;

use thiserror::Error;

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Transport failure: DNS, refused connection, reset, missing file.
    Unreachable,
    /// The fetch did not finish within the descriptor's timeout.
    Timeout,
    /// The server answered with a non-success status.
    Status,
    /// The HTTP client could not be constructed.
    Client,
}

/// Errors that can occur while fetching a resource.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Transport failure.
    #[error("source '{resource}' is unreachable at {location}: {message}")]
    Unreachable {
        resource: String,
        location: String,
        message: String,
    },

    /// Fetch exceeded its timeout.
    #[error("source '{resource}' timed out after {timeout:?} at {location}")]
    Timeout {
        resource: String,
        location: String,
        timeout: Duration,
    },

    /// Non-success HTTP status.
    #[error("source '{resource}' returned HTTP {status} at {location}")]
    Status {
        resource: String,
        location: String,
        status: u16,
    },

    /// Failed to build the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Classification of this error.
    #[must_use]
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Unreachable { .. } => FetchErrorKind::Unreachable,
            Self::Timeout { .. } => FetchErrorKind::Timeout,
            Self::Status { .. } => FetchErrorKind::Status,
            Self::Client(_) => FetchErrorKind::Client,
        }
    }

    /// Returns whether a later retry could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Client(_) => false,
        }
    }

    /// Name of the resource that failed, if the error is tied to one.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::Unreachable { resource, .. }
            | Self::Timeout { resource, .. }
            | Self::Status { resource, .. } => Some(resource),
            Self::Client(_) => None,
        }
    }
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
