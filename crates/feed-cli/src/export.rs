//! Batch export of catalog categories to partitioned files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use feed_fetch::Fetch;
use feed_output::{PartitionDate, PartitionSpec, write_json, write_parquet};

use crate::session::FeedSession;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Parquet,
    Json,
}

/// Where and how to write each category.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    pub date: PartitionDate,
    /// Extra `key=value` partitions shared by every category.
    pub partitions: Vec<(String, String)>,
}

impl ExportRequest {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ExportFormat::default(),
            date: PartitionDate::today(),
            partitions: Vec::new(),
        }
    }

    fn spec_for(&self, category: &str) -> PartitionSpec {
        self.partitions.iter().fold(
            PartitionSpec::new(category).with_date(self.date),
            |spec, (key, value)| spec.with_partition(key.clone(), value.clone()),
        )
    }
}

/// One written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Loads and writes each category, continuing past failures.
pub fn export_categories<'a, F: Fetch>(
    session: &FeedSession<F>,
    categories: &'a [String],
    request: &ExportRequest,
) -> Vec<(&'a str, Result<ExportedFile>)> {
    categories
        .iter()
        .map(|category| {
            let span = tracing::info_span!("export", category = %category);
            let _guard = span.enter();
            let outcome = export_one(session, category, request);
            if let Err(error) = &outcome {
                tracing::warn!(error = %format!("{error:#}"), "Export failed");
            }
            (category.as_str(), outcome)
        })
        .collect()
}

fn export_one<F: Fetch>(
    session: &FeedSession<F>,
    category: &str,
    request: &ExportRequest,
) -> Result<ExportedFile> {
    let table = session.load(category)?;
    let spec = request.spec_for(category);
    let root: &Path = &request.output_dir;
    let path = match request.format {
        ExportFormat::Parquet => write_parquet(&table, root, &spec),
        ExportFormat::Json => write_json(&table, root, &spec),
    }
    .with_context(|| format!("write {category}"))?;
    Ok(ExportedFile {
        path,
        rows: table.len(),
        columns: table.width(),
    })
}
