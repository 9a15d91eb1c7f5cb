//! Batch output of ingested feeds.
//!
//! Writes a [`Table`](feed_model::Table) as a date-partitioned snapshot:
//!
//! ```text
//! {root}/{dataset}/{key=value}.../year=YYYY/month=MM/day=DD/output.parquet
//! ```

mod error;
mod partition;
mod writer;

pub use error::{OutputError, Result};
pub use partition::{PartitionDate, PartitionSpec, parse_partition};
pub use writer::{
    JSON_FILE_NAME, PARQUET_FILE_NAME, table_to_dataframe, write_json, write_parquet,
};
