//! The layer capability contract and the bundled layer backends.
//!
//! Responsibilities:
//! - Define the read contract every layer implements (`Layer`).
//! - Define the optional write extension (`LayerWrite`), reached only through
//!   `Layer::writer()` after `Layer::is_mutable()` says yes.
//! - Provide the dictionary, environment and file backends.
//!
//! Does NOT handle:
//! - Precedence between layers (see `registry`).
//!
//! Invariants:
//! - A layer's name is fixed at construction; implementations expose it only
//!   through `&str`.
//! - `fetch` signals a missing key with `ConfigError::KeyNotFound` and nothing
//!   else; other errors are genuine failures.
//! - `names()` uses the same key shape `fetch` accepts, so every name it returns
//!   can be fetched back.

mod dict;
mod env;
mod file;
mod strategy;

pub use dict::DictLayer;
pub use env::{EnvLayer, load_dotenv};
pub use file::{FileFormat, FileLayer};
pub use strategy::KeyStrategy;

use std::collections::BTreeSet;

use crate::error::Result;
use crate::value::Value;

/// Read access to one named configuration source.
pub trait Layer: Send + Sync {
    /// The name the registry knows this layer by.
    fn name(&self) -> &str;

    /// Value stored at `key`, or `ConfigError::KeyNotFound`.
    fn fetch(&self, key: &str) -> Result<Value>;

    /// Every key this layer can currently answer.
    fn names(&self) -> BTreeSet<String>;

    fn contains(&self, key: &str) -> bool {
        self.fetch(key).is_ok()
    }

    /// Like `fetch`, but a missing key is `Ok(None)`. Other errors propagate.
    fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.fetch(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether this layer accepts writes. Fixed at construction.
    fn is_mutable(&self) -> bool {
        false
    }

    /// Write access, for layers that report `is_mutable()`.
    fn writer(&mut self) -> Option<&mut dyn LayerWrite> {
        None
    }
}

/// Write extension for mutable layers.
pub trait LayerWrite: Layer {
    /// Store `value` at `key`, replacing whatever was there.
    fn store(&mut self, key: &str, value: Value) -> Result<()>;

    /// Return the existing value at `key`, or store `value` and return it.
    fn store_default(&mut self, key: &str, value: Value) -> Result<Value> {
        match self.get(key)? {
            Some(existing) => Ok(existing),
            None => {
                self.store(key, value.clone())?;
                Ok(value)
            }
        }
    }
}
