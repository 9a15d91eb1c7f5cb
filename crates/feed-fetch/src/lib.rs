//! Resource fetching for feed ingestion.
//!
//! Retrieves the raw bytes behind a [`ResourceDescriptor`](feed_model::ResourceDescriptor):
//!
//! - HTTP(S) URLs, with the descriptor's timeout applied per request
//! - bucket/key objects, addressed through an HTTP endpoint template
//! - local files
//!
//! There are no retries. A failure is reported once, classified as
//! transient (unreachable, timeout, 5xx) or persistent, and the caller
//! decides what to do with it.
//!
//! # Example
//!
//! ```ignore
//! use feed_fetch::{Fetch, FetchConfig, Fetcher};
//!
//! let fetcher = Fetcher::new(FetchConfig::default())?;
//! let payload = fetcher.fetch(&descriptor)?;
//! println!("{} bytes from {}", payload.len(), payload.location);
//! ```

mod config;
mod error;
mod fetcher;
mod payload;

pub use config::{DEFAULT_OBJECT_ENDPOINT, FetchConfig, USER_AGENT};
pub use error::{FetchError, FetchErrorKind, Result};
pub use fetcher::{Fetch, Fetcher};
pub use payload::RawPayload;
