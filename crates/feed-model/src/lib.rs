//! Shared model for feed ingestion.
//!
//! This crate defines how a data source is described and what the ingestion
//! pipeline hands back to its consumers.
//!
//! # Overview
//!
//! - [`ResourceDescriptor`]: one data source (location, encoding, candidate
//!   delimiters, header position)
//! - [`Catalog`]: the per-category descriptor table, loaded from TOML or the
//!   built-in default
//! - [`Table`]: the normalized, string-only tabular result
//!
//! # Example
//!
//! ```ignore
//! use feed_model::Catalog;
//!
//! let catalog = Catalog::builtin()?;
//! let producao = catalog.get("producao").expect("known category");
//! println!("{} -> {}", producao.name, producao.location);
//! ```

mod catalog;
mod descriptor;
mod error;
mod table;

// === Error Types ===
pub use error::{CatalogError, Result};

// === Descriptors ===
pub use descriptor::{
    DEFAULT_TIMEOUT_SECS, Delimiter, Location, ResourceDescriptor, TextEncoding, Transfer,
};

// === Catalog ===
pub use catalog::{BUILTIN_CATALOG, CATALOG_ENV_VAR, Catalog};

// === Tables ===
pub use table::{IngestStats, Record, Table};
