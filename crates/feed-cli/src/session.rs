//! Catalog-backed loading with one snapshot per category.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

use feed_fetch::{Fetch, Fetcher};
use feed_ingest::{Snapshot, load_table};
use feed_model::{Catalog, Table};

/// Loads catalog categories on demand and keeps each result until invalidated.
pub struct FeedSession<F: Fetch = Fetcher> {
    catalog: Catalog,
    fetcher: F,
    snapshots: BTreeMap<String, Snapshot>,
}

impl<F: Fetch> FeedSession<F> {
    pub fn new(catalog: Catalog, fetcher: F) -> Self {
        let snapshots = catalog
            .names()
            .map(|name| (name.to_string(), Snapshot::new()))
            .collect();
        Self {
            catalog,
            fetcher,
            snapshots,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the table for `category`, fetching it on first use.
    pub fn load(&self, category: &str) -> Result<Arc<Table>> {
        let descriptor = self
            .catalog
            .get(category)
            .ok_or_else(|| anyhow!("unknown category '{category}'"))?;
        let snapshot = self
            .snapshots
            .get(category)
            .ok_or_else(|| anyhow!("unknown category '{category}'"))?;
        snapshot
            .get_or_load(|| load_table(&self.fetcher, descriptor))
            .with_context(|| format!("load {category}"))
    }

    /// Loads each category in order, keeping failures alongside successes.
    pub fn load_many<'a>(
        &self,
        categories: &'a [String],
    ) -> Vec<(&'a str, Result<Arc<Table>>)> {
        categories
            .iter()
            .map(|category| (category.as_str(), self.load(category)))
            .collect()
    }

    /// Forgets the cached table so the next load fetches again.
    pub fn invalidate(&self, category: &str) {
        if let Some(snapshot) = self.snapshots.get(category) {
            snapshot.invalidate();
        }
    }
}

/// The first `limit` records of `table` as a JSON array.
pub fn records_json(table: &Table, limit: Option<usize>) -> Result<Value> {
    let records = table
        .records()
        .take(limit.unwrap_or(usize::MAX))
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Value::Array(records))
}

/// One record as a JSON object.
pub fn row_json(table: &Table, index: usize) -> Result<Value> {
    let record = table
        .row(index)
        .ok_or_else(|| anyhow!("row {index} out of range ({} rows)", table.len()))?;
    Ok(serde_json::to_value(record)?)
}

/// Object keyed by category: records for loaded ones, an error string otherwise.
pub fn categories_json(
    outcomes: &[(&str, Result<Arc<Table>>)],
    limit: Option<usize>,
) -> Result<Value> {
    let mut object = Map::new();
    for (category, outcome) in outcomes {
        let value = match outcome {
            Ok(table) => records_json(table, limit)?,
            Err(error) => Value::String(format!("{error:#}")),
        };
        object.insert((*category).to_string(), value);
    }
    Ok(Value::Object(object))
}
