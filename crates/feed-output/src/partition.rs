//! Partitioned output paths.

use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, Utc};

use crate::error::{OutputError, Result};

/// Calendar date rendered as `year=YYYY/month=MM/day=DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartitionDate(NaiveDate);

impl PartitionDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in UTC.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// The three `key=value` segments, most significant first.
    pub fn segments(self) -> [String; 3] {
        [
            format!("year={:04}", self.0.year()),
            format!("month={:02}", self.0.month()),
            format!("day={:02}", self.0.day()),
        ]
    }
}

impl Default for PartitionDate {
    fn default() -> Self {
        Self::today()
    }
}

impl From<NaiveDate> for PartitionDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for PartitionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments().join("/"))
    }
}

/// Where one dataset snapshot lands under an output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSpec {
    pub dataset: String,
    /// Extra `key=value` partitions placed between the dataset and the date.
    pub partitions: Vec<(String, String)>,
    pub date: PartitionDate,
}

impl PartitionSpec {
    /// Partitions `dataset` by today's date only.
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            partitions: Vec::new(),
            date: PartitionDate::today(),
        }
    }

    #[must_use]
    pub fn with_partition(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.partitions.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: impl Into<PartitionDate>) -> Self {
        self.date = date.into();
        self
    }

    /// `{dataset}/{key=value}.../year=YYYY/month=MM/day=DD/{file_name}`.
    pub fn relative_path(&self, file_name: &str) -> Result<PathBuf> {
        check_segment(&self.dataset)?;
        check_segment(file_name)?;

        let mut path = PathBuf::from(&self.dataset);
        for (key, value) in &self.partitions {
            check_segment(key)?;
            check_segment(value)?;
            if key.contains('=') {
                return Err(OutputError::InvalidPartition {
                    segment: key.clone(),
                    reason: "partition keys cannot contain '='",
                });
            }
            path.push(format!("{key}={value}"));
        }
        for segment in self.date.segments() {
            path.push(segment);
        }
        path.push(file_name);
        Ok(path)
    }
}

/// Parses a `key=value` partition argument.
pub fn parse_partition(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| OutputError::InvalidPartition {
            segment: arg.to_string(),
            reason: "expected key=value",
        })?;
    let (key, value) = (key.trim(), value.trim());
    check_segment(key)?;
    check_segment(value)?;
    Ok((key.to_string(), value.to_string()))
}

fn check_segment(segment: &str) -> Result<()> {
    let reason = if segment.trim().is_empty() {
        "empty"
    } else if segment.contains(['/', '\\']) {
        "contains a path separator"
    } else if segment == "." || segment == ".." {
        "relative path component"
    } else {
        return Ok(());
    };
    Err(OutputError::InvalidPartition {
        segment: segment.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_segments_are_zero_padded() {
        let date = PartitionDate::new(day(2025, 8, 1));
        assert_eq!(date.to_string(), "year=2025/month=08/day=01");
    }

    #[test]
    fn test_relative_path() {
        let spec = PartitionSpec::new("b3_ibov")
            .with_partition("index", "IBOV")
            .with_date(day(2025, 8, 1));
        assert_eq!(
            spec.relative_path("output.parquet").unwrap(),
            Path::new("b3_ibov/index=IBOV/year=2025/month=08/day=01/output.parquet")
        );
    }

    #[test]
    fn test_relative_path_rejects_traversal() {
        let spec = PartitionSpec::new("..");
        assert!(matches!(
            spec.relative_path("output.json"),
            Err(OutputError::InvalidPartition { .. })
        ));

        let spec = PartitionSpec::new("ok").with_partition("a", "x/y");
        assert!(spec.relative_path("output.json").is_err());
    }

    #[test]
    fn test_parse_partition() {
        assert_eq!(
            parse_partition("index=IBOV").unwrap(),
            ("index".to_string(), "IBOV".to_string())
        );
        assert!(parse_partition("index").is_err());
        assert!(parse_partition("=IBOV").is_err());
    }
}
