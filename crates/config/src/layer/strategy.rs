//! Key-space strategies: flat keys vs. dot-separated paths.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::constants::KEY_SEPARATOR;
use crate::error::{ConfigError, Result};
use crate::value::{Mapping, Value};

/// How a layer interprets the keys it is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// Keys are compared verbatim; `"a.b"` is one opaque key.
    #[default]
    Flat,
    /// Keys are dot-separated paths into nested mappings.
    Hierarchical,
}

impl KeyStrategy {
    pub(crate) fn fetch(self, root: &Mapping, key: &str) -> Result<Value> {
        match self {
            KeyStrategy::Flat => root
                .get(key)
                .cloned()
                .ok_or_else(|| ConfigError::key_not_found(key)),
            KeyStrategy::Hierarchical => {
                let mut components = key.split(KEY_SEPARATOR);
                let first = components.next().unwrap_or_default();
                let mut current = root
                    .get(first)
                    .ok_or_else(|| ConfigError::key_not_found(key))?;
                for component in components {
                    current = current
                        .as_mapping()
                        .and_then(|map| map.get(component))
                        .ok_or_else(|| ConfigError::key_not_found(key))?;
                }
                Ok(current.clone())
            }
        }
    }

    pub(crate) fn names(self, root: &Mapping) -> BTreeSet<String> {
        match self {
            KeyStrategy::Flat => root.keys().cloned().collect(),
            KeyStrategy::Hierarchical => {
                let mut names = BTreeSet::new();
                collect_paths(root, &mut String::new(), &mut names);
                names
            }
        }
    }

    /// Check that every name `names` would list can be fetched back.
    ///
    /// A hierarchical key is split on `.`, so a mapping key that is empty or
    /// contains the separator is unreachable.
    pub(crate) fn validate(self, root: &Mapping) -> Result<()> {
        match self {
            KeyStrategy::Flat => Ok(()),
            KeyStrategy::Hierarchical => validate_components(root, &mut String::new()),
        }
    }

    pub(crate) fn store(self, root: &mut Mapping, key: &str, value: Value) -> Result<()> {
        match self {
            KeyStrategy::Flat => {
                root.insert(key.to_string(), value);
                Ok(())
            }
            KeyStrategy::Hierarchical => {
                let components: Vec<&str> = key.split(KEY_SEPARATOR).collect();
                if components.iter().any(|c| c.is_empty()) {
                    return Err(ConfigError::invalid_argument(format!(
                        "key '{}' contains an empty path component",
                        key
                    )));
                }
                let (leaf, parents) = components
                    .split_last()
                    .ok_or_else(|| ConfigError::invalid_argument("key must not be empty"))?;

                let mut current = root;
                for (depth, component) in parents.iter().enumerate() {
                    let slot = current
                        .entry((*component).to_string())
                        .or_insert_with(|| Value::Mapping(Mapping::new()));
                    current = match slot {
                        Value::Mapping(map) => map,
                        other => {
                            return Err(ConfigError::invalid_argument(format!(
                                "cannot store '{}': '{}' holds a {}, not a mapping",
                                key,
                                components[..=depth].join("."),
                                other.type_name()
                            )));
                        }
                    };
                }
                current.insert((*leaf).to_string(), value);
                Ok(())
            }
        }
    }
}

fn collect_paths(map: &Mapping, prefix: &mut String, out: &mut BTreeSet<String>) {
    for (key, value) in map {
        let restore = prefix.len();
        if !prefix.is_empty() {
            prefix.push(KEY_SEPARATOR);
        }
        prefix.push_str(key);
        match value {
            Value::Mapping(child) => collect_paths(child, prefix, out),
            _ => {
                out.insert(prefix.clone());
            }
        }
        prefix.truncate(restore);
    }
}

fn validate_components(map: &Mapping, prefix: &mut String) -> Result<()> {
    for (key, value) in map {
        if key.is_empty() || key.contains(KEY_SEPARATOR) {
            let parent = if prefix.is_empty() {
                "the top level".to_string()
            } else {
                format!("'{}'", prefix)
            };
            return Err(ConfigError::invalid_argument(format!(
                "key '{}' under {} is empty or contains '{}' and cannot be addressed as a path",
                key, parent, KEY_SEPARATOR
            )));
        }
        if let Value::Mapping(child) = value {
            let restore = prefix.len();
            if !prefix.is_empty() {
                prefix.push(KEY_SEPARATOR);
            }
            prefix.push_str(key);
            validate_components(child, prefix)?;
            prefix.truncate(restore);
        }
    }
    Ok(())
}

impl FromStr for KeyStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(KeyStrategy::Flat),
            "hierarchical" | "split" | "dotted" => Ok(KeyStrategy::Hierarchical),
            _ => Err(ConfigError::invalid_argument(format!(
                "unknown key strategy '{}'. Valid options: flat, hierarchical",
                s
            ))),
        }
    }
}

impl fmt::Display for KeyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStrategy::Flat => f.write_str("flat"),
            KeyStrategy::Hierarchical => f.write_str("hierarchical"),
        }
    }
}
