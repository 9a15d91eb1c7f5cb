//! The in-memory table handed to consumers.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Counters describing what ingestion discarded on the way to a [`Table`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestStats {
    /// Data lines whose field count did not match the header.
    pub skipped_lines: usize,
    /// Rows removed because every cell was null.
    pub dropped_rows: usize,
    /// Columns removed because every cell was null.
    pub dropped_columns: usize,
    /// Columns shadowed by a later column with the same normalized name.
    pub collided_columns: usize,
}

/// Ordered rows of string/null cells under unique column names.
///
/// Every row has exactly one cell per column; [`Table::push_row`] refuses
/// anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    stats: IngestStats,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            stats: IngestStats::default(),
        }
    }

    /// Appends a row. Returns false (and leaves the table untouched) if the
    /// row width does not match the column count.
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> bool {
        if row.len() != self.columns.len() {
            return false;
        }
        self.rows.push(row);
        true
    }

    /// Attaches ingestion counters.
    #[must_use]
    pub fn with_stats(mut self, stats: IngestStats) -> Self {
        self.stats = stats;
        self
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Ingestion counters.
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// One row as a record view.
    pub fn row(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|cells| Record {
            columns: &self.columns,
            cells,
        })
    }

    /// Iterates over all rows as record views.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record {
            columns: &self.columns,
            cells,
        })
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}

/// Borrowed view of one row, keyed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Option<String>],
}

impl<'a> Record<'a> {
    /// Cell value for `column`; `None` when the cell is null or the column is unknown.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.cells[idx].as_deref()
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        let (columns, cells) = (self.columns, self.cells);
        columns
            .iter()
            .map(String::as_str)
            .zip(cells.iter().map(Option::as_deref))
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}
