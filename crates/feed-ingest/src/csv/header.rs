//! Delimiter and header resolution.

use feed_model::{Delimiter, ResourceDescriptor};

use crate::error::SchemaError;

/// Where the header lives and how lines are cleaned before splitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Zero-based line where the header search starts.
    pub header_row: usize,
    /// Strip trailing delimiters from every line before splitting.
    pub trim_trailing_delimiter: bool,
}

impl From<&ResourceDescriptor> for HeaderLayout {
    fn from(descriptor: &ResourceDescriptor) -> Self {
        Self {
            header_row: descriptor.header_row,
            trim_trailing_delimiter: descriptor.trim_trailing_delimiter,
        }
    }
}

/// Outcome of header resolution. Derived once per payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    /// Chosen field separator.
    pub delimiter: Delimiter,
    /// Raw header fields, trimmed, in order.
    pub header: Vec<String>,
    /// Zero-based line index of the header.
    pub header_line: usize,
    /// Zero-based line index of the first data line.
    pub data_start: usize,
    /// Whether trailing delimiters are stripped from data lines too.
    pub trim_trailing_delimiter: bool,
}

impl ResolvedSchema {
    /// Number of header fields.
    pub fn len(&self) -> usize {
        self.header.len()
    }

    /// Returns true if the header has no fields.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}

/// Picks the delimiter and header row for `text`.
///
/// The header is the first non-blank line at or after `layout.header_row`.
/// Candidates are tried in the given order and the first one that splits
/// the header into more than one field wins, even if a later candidate
/// would produce more columns.
pub fn resolve(
    text: &str,
    candidates: &[Delimiter],
    layout: HeaderLayout,
) -> Result<ResolvedSchema, SchemaError> {
    let (header_line, line) = text
        .lines()
        .enumerate()
        .skip(layout.header_row)
        .find(|(_, line)| !line.trim().is_empty())
        .ok_or(SchemaError::NoHeader {
            header_row: layout.header_row,
        })?;

    for &delimiter in candidates {
        let cleaned = clean_line(line, delimiter, layout.trim_trailing_delimiter);
        let header = split_fields(cleaned, delimiter);
        tracing::trace!(%delimiter, fields = header.len(), "Tried header delimiter");
        if header.len() > 1 {
            tracing::debug!(
                %delimiter,
                header_line,
                columns = header.len(),
                "Resolved header"
            );
            return Ok(ResolvedSchema {
                delimiter,
                header,
                header_line,
                data_start: header_line + 1,
                trim_trailing_delimiter: layout.trim_trailing_delimiter,
            });
        }
    }

    Err(SchemaError::NoDelimiterDetected {
        attempted: candidates.to_vec(),
        line: header_line,
    })
}

/// Applies the per-line cleanup used for both header and data lines.
pub(crate) fn clean_line(line: &str, delimiter: Delimiter, trim_trailing: bool) -> &str {
    let line = line.strip_prefix('\u{feff}').unwrap_or(line);
    let line = line.trim_end_matches(['\r', '\n']);
    if trim_trailing {
        line.trim_end_matches(|c: char| delimiter.matches(c) || c.is_whitespace())
    } else {
        line
    }
}

/// Splits one line into trimmed fields.
///
/// Character delimiters honor double-quoted fields (with `""` escapes);
/// the whitespace delimiter splits on runs of whitespace.
pub fn split_fields(line: &str, delimiter: Delimiter) -> Vec<String> {
    match delimiter {
        Delimiter::Whitespace => line.split_whitespace().map(str::to_string).collect(),
        Delimiter::Char(byte) => {
            let mut reader = ::csv::ReaderBuilder::new()
                .delimiter(byte)
                .has_headers(false)
                .flexible(true)
                .trim(::csv::Trim::All)
                .from_reader(line.as_bytes());
            match reader.records().next() {
                Some(Ok(record)) => record.iter().map(str::to_string).collect(),
                _ => Vec::new(),
            }
        }
    }
}
