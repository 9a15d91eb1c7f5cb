//! Delimited-text parsing.

mod header;
mod reader;

pub use header::{HeaderLayout, ResolvedSchema, resolve, split_fields};
pub use reader::materialize;
