//! Parquet and JSON writers.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use polars::prelude::{Column, DataFrame, ParquetWriter};

use feed_model::Table;

use crate::error::{OutputError, Result};
use crate::partition::PartitionSpec;

/// File name of the Parquet snapshot inside a partition.
pub const PARQUET_FILE_NAME: &str = "output.parquet";

/// File name of the JSON snapshot inside a partition.
pub const JSON_FILE_NAME: &str = "output.json";

/// Converts a table into a frame of nullable string columns.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let columns = table
        .columns()
        .iter()
        .map(|name| {
            let values = table.column(name).unwrap_or_default();
            Column::new(name.as_str().into(), values)
        })
        .collect::<Vec<_>>();
    Ok(DataFrame::new(columns)?)
}

/// Writes `table` as Parquet under `root` and returns the file path.
pub fn write_parquet(table: &Table, root: &Path, spec: &PartitionSpec) -> Result<PathBuf> {
    let path = root.join(spec.relative_path(PARQUET_FILE_NAME)?);
    let mut df = table_to_dataframe(table)?;

    ensure_parent_dir(&path)?;
    let file = File::create(&path).map_err(|source| io_error(&path, source))?;
    ParquetWriter::new(file).finish(&mut df)?;

    tracing::info!(
        dataset = %spec.dataset,
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Wrote Parquet snapshot"
    );
    Ok(path)
}

/// Writes `table` as a JSON array of records under `root` and returns the file path.
pub fn write_json(table: &Table, root: &Path, spec: &PartitionSpec) -> Result<PathBuf> {
    let path = root.join(spec.relative_path(JSON_FILE_NAME)?);

    ensure_parent_dir(&path)?;
    let file = File::create(&path).map_err(|source| io_error(&path, source))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, table).map_err(|source| OutputError::Json {
        path: path.clone(),
        source,
    })?;
    writer.flush().map_err(|source| io_error(&path, source))?;

    tracing::info!(
        dataset = %spec.dataset,
        path = %path.display(),
        rows = table.len(),
        "Wrote JSON snapshot"
    );
    Ok(path)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> OutputError {
    OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}
