//! File-backed layer for JSON, TOML and INI documents.
//!
//! Responsibilities:
//! - Read one or more config files and merge them in order into one key space.
//! - Detect the document format from the file extension.
//! - Flatten INI sections into dot paths: `[section]` `option = v` is
//!   `section.option`, always a string.
//!
//! Does NOT handle:
//! - Watching files for changes; the layer is read once at construction.
//!
//! Invariants:
//! - Keys are hierarchical: `[database] host = "x"` is `database.host`.
//! - A document key that is empty or contains `.` fails to parse, so every
//!   listed name can be fetched.
//! - INI option names are lower-cased; section names keep their case.
//! - Later files override earlier ones key by key (deep merge).
//! - Missing files are skipped; files that exist but cannot be read or parsed fail.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;

use super::{DictLayer, KeyStrategy, Layer};
use crate::constants::KEY_SEPARATOR;
use crate::error::{ConfigError, Result};
use crate::value::{Mapping, Value};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Ini,
}

impl FileFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| ConfigError::UnsupportedFileFormat {
                path: path.to_path_buf(),
            })
    }

    fn parse_document(self, content: &str) -> std::result::Result<Value, String> {
        match self {
            FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            FileFormat::Ini => parse_ini(content),
        }
    }
}

/// Options outside any section become top-level keys.
fn parse_ini(content: &str) -> std::result::Result<Value, String> {
    let ini = Ini::load_from_str(content).map_err(|e| e.to_string())?;
    let mut root = Mapping::new();
    for (section, properties) in ini.iter() {
        for (option, value) in properties.iter() {
            let option = option.to_lowercase();
            let key = match section {
                Some(section) => format!("{}{}{}", section, KEY_SEPARATOR, option),
                None => option,
            };
            KeyStrategy::Hierarchical
                .store(&mut root, &key, Value::String(value.to_string()))
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(Value::Mapping(root))
}

impl FromStr for FileFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(FileFormat::Json),
            "toml" => Ok(FileFormat::Toml),
            "ini" => Ok(FileFormat::Ini),
            _ => Err(ConfigError::invalid_argument(format!(
                "Invalid file format: {}. Valid options: json, toml, ini",
                s
            ))),
        }
    }
}

/// A read-only hierarchical layer built from config files.
#[derive(Debug, Clone)]
pub struct FileLayer {
    inner: DictLayer,
    sources: Vec<PathBuf>,
}

impl FileLayer {
    /// Read and merge `paths` in order. Missing files are skipped.
    pub fn load<P: AsRef<Path>>(
        name: impl Into<String>,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<Self> {
        let name = name.into();
        let mut merged = Value::Mapping(Mapping::new());
        let mut sources = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let format = FileFormat::from_path(path)?;
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(layer = %name, path = %path.display(), "config file not found, skipping");
                    continue;
                }
                Err(source) => {
                    return Err(ConfigError::ConfigFileRead {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            };
            let document = parse_mapping(format, &content, path)?;
            merged.merge(document);
            sources.push(path.to_path_buf());
        }

        tracing::debug!(layer = %name, files = sources.len(), "loaded file layer");
        Self::build(name, merged, sources)
    }

    /// Build a layer from an in-memory document.
    pub fn parse(name: impl Into<String>, content: &str, format: FileFormat) -> Result<Self> {
        let document = parse_mapping(format, content, Path::new("<inline>"))?;
        Self::build(name.into(), document, Vec::new())
    }

    fn build(name: String, document: Value, sources: Vec<PathBuf>) -> Result<Self> {
        let inner =
            DictLayer::from_value(name, document)?.with_strategy(KeyStrategy::Hierarchical)?;
        Ok(Self { inner, sources })
    }

    /// Files that were actually read, in merge order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn parse_mapping(format: FileFormat, content: &str, path: &Path) -> Result<Value> {
    let document = format
        .parse_document(content)
        .map_err(|message| ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            message,
        })?;
    let Some(root) = document.as_mapping() else {
        return Err(ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            message: format!("top-level value is a {}, expected a mapping", document.type_name()),
        });
    };
    if let Err(e) = KeyStrategy::Hierarchical.validate(root) {
        return Err(ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        });
    }
    Ok(document)
}

impl Layer for FileLayer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(&self, key: &str) -> Result<Value> {
        self.inner.fetch(key)
    }

    fn names(&self) -> BTreeSet<String> {
        self.inner.names()
    }
}
