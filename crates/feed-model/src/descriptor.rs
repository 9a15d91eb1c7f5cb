//! Resource descriptors: where a feed lives and how to parse it.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use encoding_rs::Encoding;

use crate::error::{CatalogError, Result};

/// Default fetch timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the raw bytes of a feed are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Remote HTTP(S) resource.
    Url(String),
    /// Object in a bucket, addressed through the fetcher's object endpoint.
    Object { bucket: String, key: String },
    /// File on the local file system.
    Path(PathBuf),
}

impl Location {
    /// Returns true if the location has no usable address.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Url(url) => url.trim().is_empty(),
            Self::Object { bucket, key } => bucket.trim().is_empty() || key.trim().is_empty(),
            Self::Path(path) => path.as_os_str().is_empty(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Object { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Character encoding used to decode a payload.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// UTF-8.
    pub fn utf_8() -> Self {
        Self(encoding_rs::UTF_8)
    }

    /// ISO-8859-1, which `encoding_rs` maps to windows-1252 (a superset).
    pub fn latin_1() -> Self {
        Self(encoding_rs::WINDOWS_1252)
    }

    /// Looks up an encoding by its WHATWG label (`utf-8`, `latin1`, `cp1252`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(Self)
    }

    /// The underlying `encoding_rs` encoding.
    pub fn encoding(self) -> &'static Encoding {
        self.0
    }

    /// Canonical encoding name.
    pub fn name(self) -> &'static str {
        self.0.name()
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf_8()
    }
}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transfer encoding wrapped around the character data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transfer {
    /// Bytes are the document itself.
    #[default]
    Plain,
    /// Bytes are a base64 rendering of the document.
    Base64,
}

/// A field separator candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// A single ASCII separator character.
    Char(u8),
    /// Any run of whitespace.
    Whitespace,
}

impl Delimiter {
    pub const SEMICOLON: Self = Self::Char(b';');
    pub const COMMA: Self = Self::Char(b',');
    pub const TAB: Self = Self::Char(b'\t');

    /// Parses the textual form used in catalogs.
    ///
    /// Accepts a single ASCII character, `tab`, or `whitespace` (also `\s+`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "whitespace" | "\\s+" | "\\s{1,}" => Some(Self::Whitespace),
            "tab" | "\\t" => Some(Self::TAB),
            _ => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii() => Some(Self::Char(c as u8)),
                    _ => None,
                }
            }
        }
    }

    /// Returns true if `c` terminates a field for this delimiter.
    pub fn matches(self, c: char) -> bool {
        match self {
            Self::Char(byte) => c == byte as char,
            Self::Whitespace => c.is_whitespace(),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(b'\t') => f.write_str("tab"),
            Self::Char(byte) => write!(f, "{}", *byte as char),
            Self::Whitespace => f.write_str("whitespace"),
        }
    }
}

/// Configuration identifying one data source and its parsing hints.
///
/// Descriptors are built once (usually from a [`Catalog`](crate::Catalog))
/// and only ever borrowed by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    /// Category name, unique within a catalog.
    pub name: String,
    /// Where the bytes come from.
    pub location: Location,
    /// Expected character encoding.
    pub encoding: TextEncoding,
    /// Candidate delimiters in priority order.
    pub delimiters: Vec<Delimiter>,
    /// Zero-based physical line where the header search starts.
    pub header_row: usize,
    /// Strip trailing delimiters from every line before splitting.
    pub trim_trailing_delimiter: bool,
    /// Transfer encoding of the fetched bytes.
    pub transfer: Transfer,
    /// Upper bound for the fetch.
    pub timeout: Duration,
}

impl ResourceDescriptor {
    /// Creates a descriptor with UTF-8, `;` then `,` as candidates and a header on line 0.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            encoding: TextEncoding::default(),
            delimiters: vec![Delimiter::SEMICOLON, Delimiter::COMMA],
            header_row: 0,
            trim_trailing_delimiter: false,
            transfer: Transfer::Plain,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: impl Into<Vec<Delimiter>>) -> Self {
        self.delimiters = delimiters.into();
        self
    }

    #[must_use]
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    #[must_use]
    pub fn with_trim_trailing_delimiter(mut self, enable: bool) -> Self {
        self.trim_trailing_delimiter = enable;
        self
    }

    #[must_use]
    pub fn with_transfer(mut self, transfer: Transfer) -> Self {
        self.transfer = transfer;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks the invariants every descriptor must hold.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| CatalogError::InvalidDescriptor {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.location.is_empty() {
            return Err(invalid("location is empty"));
        }
        if self.delimiters.is_empty() {
            return Err(invalid("no candidate delimiters"));
        }
        if self.timeout.is_zero() {
            return Err(invalid("timeout must be positive"));
        }
        Ok(())
    }
}
