//! In-memory dictionary layer.
//!
//! Responsibilities:
//! - Hold a mapping supplied by the caller and answer the layer contract over it.
//! - Accept writes when constructed as mutable.
//!
//! Invariants:
//! - Strategy and mutability are chosen with the `with_*` builders before the
//!   layer is registered and never change afterwards.
//! - Every name a layer lists can be fetched back; `with_strategy` refuses data
//!   the chosen strategy cannot address.

use std::collections::BTreeSet;

use super::{KeyStrategy, Layer, LayerWrite};
use crate::error::{ConfigError, Result};
use crate::value::{Mapping, Value};

/// A layer backed by an in-memory mapping.
#[derive(Debug, Clone)]
pub struct DictLayer {
    name: String,
    data: Mapping,
    strategy: KeyStrategy,
    mutable: bool,
}

impl DictLayer {
    /// Create a flat, read-only layer from key/value pairs.
    pub fn new<K, V>(name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            data: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            strategy: KeyStrategy::Flat,
            mutable: false,
        }
    }

    /// Create an empty layer.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::<(String, Value)>::new())
    }

    /// Create a layer from a mapping value (e.g. a parsed document).
    ///
    /// Fails with `InvalidArgument` if `value` is not a mapping.
    pub fn from_value(name: impl Into<String>, value: Value) -> Result<Self> {
        let name = name.into();
        match value {
            Value::Mapping(data) => Ok(Self {
                name,
                data,
                strategy: KeyStrategy::Flat,
                mutable: false,
            }),
            other => Err(ConfigError::invalid_argument(format!(
                "layer '{}' needs a mapping, got a {}",
                name,
                other.type_name()
            ))),
        }
    }

    /// Choose how keys are interpreted.
    ///
    /// Fails with `InvalidArgument` when a stored key is empty or contains `.`
    /// and `strategy` is hierarchical.
    pub fn with_strategy(mut self, strategy: KeyStrategy) -> Result<Self> {
        strategy.validate(&self.data).map_err(|e| match e {
            ConfigError::InvalidArgument { message } => {
                ConfigError::invalid_argument(format!("layer '{}': {}", self.name, message))
            }
            other => other,
        })?;
        self.strategy = strategy;
        Ok(self)
    }

    /// Choose whether the layer accepts writes.
    pub fn with_mutable(mut self, mutable: bool) -> Self {
        self.mutable = mutable;
        self
    }

    pub fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    /// Number of resolvable keys.
    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Layer for DictLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, key: &str) -> Result<Value> {
        self.strategy.fetch(&self.data, key)
    }

    fn names(&self) -> BTreeSet<String> {
        self.strategy.names(&self.data)
    }

    fn is_mutable(&self) -> bool {
        self.mutable
    }

    fn writer(&mut self) -> Option<&mut dyn LayerWrite> {
        if self.mutable { Some(self) } else { None }
    }
}

impl LayerWrite for DictLayer {
    fn store(&mut self, key: &str, value: Value) -> Result<()> {
        if !self.mutable {
            return Err(ConfigError::ImmutableLayer {
                name: self.name.clone(),
            });
        }
        self.strategy.store(&mut self.data, key, value)
    }

    fn store_default(&mut self, key: &str, value: Value) -> Result<Value> {
        if !self.mutable {
            return Err(ConfigError::ImmutableLayer {
                name: self.name.clone(),
            });
        }
        match self.get(key)? {
            Some(existing) => Ok(existing),
            None => {
                self.strategy.store(&mut self.data, key, value.clone())?;
                Ok(value)
            }
        }
    }
}
