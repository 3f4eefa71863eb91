//! Environment variable layer.
//!
//! Responsibilities:
//! - Snapshot the process environment (or an explicit variable set) at construction.
//! - Map dot-path keys onto variable names (`db.host` -> `DB_HOST`, `APP_DB_HOST`
//!   with a prefix) and back again for enumeration.
//! - Load a `.env` file into the process environment on request.
//!
//! Does NOT handle:
//! - Writes. The layer is a read-only snapshot; later changes to the process
//!   environment are not observed.
//!
//! Invariants:
//! - Variable names match case-insensitively; the prefix filter does too.
//! - Empty or whitespace-only values are treated as unset; values are trimmed.
//! - The `_` separator is literal and not escapable: `APP_DB__HOST` is `db..host`.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::collections::{BTreeMap, BTreeSet};

use super::Layer;
use crate::constants::{DOTENV_DISABLED_VAR, ENV_SEPARATOR, KEY_SEPARATOR};
use crate::error::{ConfigError, Result};
use crate::value::Value;

/// A read-only layer over environment variables.
#[derive(Debug, Clone)]
pub struct EnvLayer {
    name: String,
    prefix: Option<String>,
    /// Upper-cased variable name -> trimmed value.
    vars: BTreeMap<String, String>,
}

impl EnvLayer {
    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_vars(
            name,
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Build the layer from an explicit set of variables.
    pub fn from_vars<K, V>(name: impl Into<String>, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let name = name.into();
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .filter_map(|(k, v)| {
                let value = non_blank(v.as_ref())?;
                Some((k.as_ref().to_uppercase(), value))
            })
            .collect();
        tracing::debug!(layer = %name, vars = vars.len(), "captured environment snapshot");
        Self {
            name,
            prefix: None,
            vars,
        }
    }

    /// Only expose variables starting with `PREFIX_`, with the prefix stripped.
    ///
    /// Matching is case-insensitive and a trailing `_` on `prefix` is ignored.
    /// A blank prefix removes the filter.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        let normalized = prefix
            .trim()
            .trim_end_matches(ENV_SEPARATOR)
            .to_uppercase();
        self.prefix = if normalized.is_empty() {
            None
        } else {
            Some(normalized)
        };
        self
    }

    /// The normalized (upper-case) prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Variable name consulted for `key`.
    pub fn var_name(&self, key: &str) -> String {
        let body: String = key
            .chars()
            .map(|c| if c == KEY_SEPARATOR { ENV_SEPARATOR } else { c })
            .collect::<String>()
            .to_uppercase();
        match &self.prefix {
            Some(prefix) => format!("{}{}{}", prefix, ENV_SEPARATOR, body),
            None => body,
        }
    }

    fn visible_key(&self, var: &str) -> Option<String> {
        let rest = match &self.prefix {
            Some(prefix) => var.strip_prefix(prefix.as_str())?.strip_prefix(ENV_SEPARATOR)?,
            None => var,
        };
        if rest.is_empty() {
            return None;
        }
        Some(
            rest.to_lowercase()
                .chars()
                .map(|c| if c == ENV_SEPARATOR { KEY_SEPARATOR } else { c })
                .collect(),
        )
    }
}

impl Layer for EnvLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, key: &str) -> Result<Value> {
        if key.is_empty() {
            return Err(ConfigError::key_not_found(key));
        }
        self.vars
            .get(&self.var_name(key))
            .map(|v| Value::String(v.clone()))
            .ok_or_else(|| ConfigError::key_not_found(key))
    }

    fn names(&self) -> BTreeSet<String> {
        self.vars
            .keys()
            .filter_map(|var| self.visible_key(var))
            .collect()
    }
}

/// Trimmed value, or `None` if empty or whitespace-only.
fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Load variables from a `.env` file into the process environment, if present.
///
/// Call this before constructing an [`EnvLayer`] so the snapshot sees them.
/// If `DOTENV_DISABLED` is set to "true" or "1", nothing is loaded.
///
/// # Errors
///
/// - `ConfigError::DotenvParse` if the file exists but has invalid syntax
/// - `ConfigError::DotenvIo` if the file exists but cannot be read
///
/// Missing `.env` files are silently ignored.
///
/// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
pub fn load_dotenv() -> Result<()> {
    if dotenv_disabled() {
        tracing::debug!("dotenv loading disabled");
        return Ok(());
    }

    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            Ok(())
        }
        Err(dotenvy::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(dotenvy::Error::LineParse(_, idx)) => Err(ConfigError::DotenvParse { error_index: idx }),
        Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
            kind: io_err.kind(),
        }),
        Err(_) => Err(ConfigError::DotenvUnknown),
    }
}
