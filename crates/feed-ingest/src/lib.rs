//! Feed ingestion.
//!
//! Turns the raw bytes of a delimited-text feed into a [`Table`] with clean,
//! unique column names.
//!
//! # Pipeline
//!
//! - **Decode**: optional base64 transfer decoding, charset decoding with BOM
//!   removal, NUL stripping and removal of trailing line breaks
//! - **Resolve**: pick the header line and the first delimiter candidate that
//!   splits it into more than one field
//! - **Normalize**: lower-case, underscore and strip accents from column names
//! - **Materialize**: split each data line, skipping ragged lines and pruning
//!   empty rows and columns
//!
//! # Example
//!
//! ```ignore
//! use feed_fetch::{FetchConfig, Fetcher};
//! use feed_ingest::load_table;
//! use feed_model::Catalog;
//!
//! let catalog = Catalog::builtin()?;
//! let fetcher = Fetcher::new(FetchConfig::default())?;
//! let table = load_table(&fetcher, catalog.get("producao").unwrap())?;
//! println!("{} rows", table.len());
//! ```
//!
//! [`Table`]: feed_model::Table

mod csv;
mod decode;
mod error;
mod normalize;
mod pipeline;
mod snapshot;

// === Error Types ===
pub use error::{IngestError, IngestErrorKind, MaterializeError, Result, SchemaError};

// === Decoding ===
pub use decode::{DecodedText, decode_payload, decode_text, repair_text};

// === Parsing ===
pub use csv::{HeaderLayout, ResolvedSchema, materialize, resolve, split_fields};
pub use normalize::{NormalizedColumn, normalize, normalize_header, normalize_name};

// === Pipeline ===
pub use pipeline::{ingest_payload, ingest_text, load_table};
pub use snapshot::Snapshot;
