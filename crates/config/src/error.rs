//! Error types for layered configuration resolution.
//!
//! Responsibilities:
//! - Define one error variant per failure kind callers may want to branch on.
//! - Distinguish "key not found" (swallowed by `get`-style access) from every
//!   other failure (always surfaced).
//!
//! Invariants:
//! - All error variants include context for debugging (keys, layer names, paths).
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building layers or resolving keys.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No configuration key '{key}' found in any layer")]
    KeyNotFound { key: String },

    #[error("Layer '{name}' is not registered")]
    LayerNotFound { name: String },

    #[error("Layer '{name}' does not accept writes")]
    ImmutableLayer { name: String },

    #[error("No mutable layer is registered to accept writes")]
    NoMutableLayer,

    /// Nothing was added or inserted when this is returned.
    #[error("Layer name(s) already registered: {}", .names.join(", "))]
    LayerNameCollision { names: Vec<String> },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Failed to read config file at {path}")]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {message}")]
    ConfigFileParse { path: PathBuf, message: String },

    #[error("Unsupported config file format: {path} (expected .json or .toml)")]
    UnsupportedFileFormat { path: PathBuf },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

impl ConfigError {
    pub(crate) fn key_not_found(key: &str) -> Self {
        ConfigError::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub(crate) fn layer_not_found(name: &str) -> Self {
        ConfigError::LayerNotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ConfigError::InvalidArgument {
            message: message.into(),
        }
    }

    /// True only for [`ConfigError::KeyNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::KeyNotFound { .. })
    }

    /// True when a write was refused, by a specific layer or for lack of any
    /// mutable layer.
    pub fn is_immutable(&self) -> bool {
        matches!(
            self,
            ConfigError::ImmutableLayer { .. } | ConfigError::NoMutableLayer
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
