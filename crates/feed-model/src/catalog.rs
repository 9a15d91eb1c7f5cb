//! Descriptor catalog: the per-category configuration table.
//!
//! A catalog is a TOML document with one `[[source]]` table per category.
//! The default catalog is compiled into the crate; a different one can be
//! selected with the `FEED_CATALOG` environment variable or loaded directly
//! with [`Catalog::load_from`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::descriptor::{
    DEFAULT_TIMEOUT_SECS, Delimiter, Location, ResourceDescriptor, TextEncoding, Transfer,
};
use crate::error::{CatalogError, Result};

/// Environment variable for overriding the built-in catalog.
pub const CATALOG_ENV_VAR: &str = "FEED_CATALOG";

/// TOML source of the built-in catalog.
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/default.toml");

/// Ordered set of uniquely named descriptors.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sources: Vec<ResourceDescriptor>,
}

impl Catalog {
    /// Builds a catalog from descriptors, validating each and rejecting duplicates.
    pub fn new(sources: Vec<ResourceDescriptor>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for source in &sources {
            source.validate()?;
            if !seen.insert(source.name.as_str()) {
                return Err(CatalogError::DuplicateName {
                    name: source.name.clone(),
                });
            }
        }
        Ok(Self { sources })
    }

    /// The catalog compiled into the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG, "<builtin>", None)
    }

    /// Loads the catalog named by `FEED_CATALOG`, or the built-in one.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CATALOG_ENV_VAR) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => Self::builtin(),
        }
    }

    /// Loads a catalog file. Relative `path` locations resolve against the file's directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let catalog = Self::from_toml_str(&text, &path.display().to_string(), base_dir)?;
        tracing::debug!(
            path = %path.display(),
            sources = catalog.len(),
            "Loaded feed catalog"
        );
        Ok(catalog)
    }

    /// Parses catalog TOML. `origin` is only used in error messages.
    pub fn from_toml_str(text: &str, origin: &str, base_dir: Option<&Path>) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text).map_err(|e| CatalogError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        let sources = file
            .sources
            .into_iter()
            .map(|entry| entry.into_descriptor(base_dir))
            .collect::<Result<Vec<_>>>()?;
        Self::new(sources)
    }

    /// Looks up a descriptor by category name.
    pub fn get(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Category names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }

    /// Descriptors in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.sources.iter()
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if the catalog has no descriptors.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

// =============================================================================
// TOML Row Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "source")]
    sources: Vec<SourceEntry>,
}

/// One `[[source]]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceEntry {
    name: String,
    url: Option<String>,
    bucket: Option<String>,
    key: Option<String>,
    path: Option<PathBuf>,
    #[serde(default = "default_encoding")]
    encoding: String,
    delimiters: Vec<String>,
    #[serde(default)]
    header_row: usize,
    #[serde(default)]
    trim_trailing_delimiter: bool,
    #[serde(default)]
    transfer: Transfer,
    timeout_secs: Option<u64>,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl SourceEntry {
    fn into_descriptor(self, base_dir: Option<&Path>) -> Result<ResourceDescriptor> {
        let location = match (self.url, self.bucket, self.key, self.path) {
            (Some(url), None, None, None) => Location::Url(url),
            (None, Some(bucket), Some(key), None) => Location::Object { bucket, key },
            (None, None, None, Some(path)) => match base_dir {
                Some(dir) if path.is_relative() => Location::Path(dir.join(path)),
                _ => Location::Path(path),
            },
            _ => {
                return Err(CatalogError::InvalidDescriptor {
                    name: self.name,
                    reason: "expected exactly one of `url`, `bucket` + `key`, or `path`"
                        .to_string(),
                });
            }
        };

        let encoding = TextEncoding::from_label(&self.encoding).ok_or_else(|| {
            CatalogError::UnknownEncoding {
                name: self.name.clone(),
                label: self.encoding.clone(),
            }
        })?;

        let delimiters = self
            .delimiters
            .iter()
            .map(|value| {
                Delimiter::parse(value).ok_or_else(|| CatalogError::InvalidDelimiter {
                    name: self.name.clone(),
                    value: value.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResourceDescriptor::new(self.name, location)
            .with_encoding(encoding)
            .with_delimiters(delimiters)
            .with_header_row(self.header_row)
            .with_trim_trailing_delimiter(self.trim_trailing_delimiter)
            .with_transfer(self.transfer)
            .with_timeout(Duration::from_secs(
                self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 18);

        let producao = catalog.get("producao").unwrap();
        assert_eq!(producao.encoding, TextEncoding::latin_1());
        assert_eq!(producao.delimiters[0], Delimiter::SEMICOLON);
        assert_eq!(producao.header_row, 0);

        let b3 = catalog.get("b3_ibov").unwrap();
        assert_eq!(b3.transfer, Transfer::Base64);
        assert_eq!(b3.header_row, 1);
        assert!(b3.trim_trailing_delimiter);

        let running = catalog.get("running_athletes").unwrap();
        assert!(matches!(running.location, Location::Object { .. }));
        assert_eq!(running.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_whitespace_delimiter_in_export_feeds() {
        let catalog = Catalog::builtin().unwrap();
        let exp = catalog.get("exp_vinho").unwrap();
        assert_eq!(exp.delimiters.last(), Some(&Delimiter::Whitespace));
    }

    #[test]
    fn test_rejects_ambiguous_location() {
        let text = r#"
            [[source]]
            name = "both"
            url = "http://example.com/a.csv"
            path = "a.csv"
            delimiters = [";"]
        "#;
        let err = Catalog::from_toml_str(text, "test", None).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_rejects_unknown_encoding() {
        let text = r#"
            [[source]]
            name = "weird"
            url = "http://example.com/a.csv"
            encoding = "ebcdic-martian"
            delimiters = [";"]
        "#;
        let err = Catalog::from_toml_str(text, "test", None).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownEncoding { .. }));
    }

    #[test]
    fn test_rejects_bad_delimiter() {
        let text = r#"
            [[source]]
            name = "bad"
            url = "http://example.com/a.csv"
            delimiters = ["::"]
        "#;
        let err = Catalog::from_toml_str(text, "test", None).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDelimiter { .. }));
    }

    #[test]
    fn test_rejects_duplicates() {
        let text = r#"
            [[source]]
            name = "dup"
            url = "http://example.com/a.csv"
            delimiters = [";"]

            [[source]]
            name = "dup"
            url = "http://example.com/b.csv"
            delimiters = [","]
        "#;
        let err = Catalog::from_toml_str(text, "test", None).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName { .. }));
    }

    #[test]
    fn test_relative_paths_resolve_against_base_dir() {
        let text = r#"
            [[source]]
            name = "local"
            path = "data/file.csv"
            delimiters = [","]
        "#;
        let catalog = Catalog::from_toml_str(text, "test", Some(Path::new("/srv/feeds"))).unwrap();
        assert_eq!(
            catalog.get("local").unwrap().location,
            Location::Path(PathBuf::from("/srv/feeds/data/file.csv"))
        );
    }
}
