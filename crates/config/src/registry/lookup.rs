//! Builder for `get`-style lookups.
//!
//! A lookup can be scoped to one layer, given a default, and given a callback
//! applied to a found value. The callback never sees the default.

use super::{Registry, validate_key};
use crate::error::Result;
use crate::value::Value;

/// A pending lookup of one key. Created by [`Registry::lookup`].
#[derive(Debug, Clone, Copy)]
#[must_use = "a lookup does nothing until `value`, `value_or`, `map` or `map_or` is called"]
pub struct Lookup<'a> {
    registry: &'a Registry,
    key: &'a str,
    layer: Option<&'a str>,
}

impl<'a> Lookup<'a> {
    pub(super) fn new(registry: &'a Registry, key: &'a str) -> Self {
        Self {
            registry,
            key,
            layer: None,
        }
    }

    /// Consult only the layer called `name`.
    ///
    /// The lookup then fails with `LayerNotFound` if no such layer is
    /// registered, before the key is looked at.
    pub fn in_layer(mut self, name: &'a str) -> Self {
        self.layer = Some(name);
        self
    }

    /// The found value, or `None`.
    pub fn value(self) -> Result<Option<Value>> {
        validate_key(self.key)?;
        match self.layer {
            Some(name) => self.registry.layer(name)?.get(self.key),
            None => match self.registry.resolve(self.key) {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.is_not_found() => Ok(None),
                Err(e) => Err(e),
            },
        }
    }

    /// The found value, or `default`.
    pub fn value_or(self, default: impl Into<Value>) -> Result<Value> {
        Ok(self.value()?.unwrap_or_else(|| default.into()))
    }

    /// Apply `callback` to the found value.
    pub fn map<T>(self, callback: impl FnOnce(Value) -> T) -> Result<Option<T>> {
        Ok(self.value()?.map(callback))
    }

    /// Apply `callback` to the found value, or return `default` untouched.
    pub fn map_or<T>(self, default: T, callback: impl FnOnce(Value) -> T) -> Result<T> {
        Ok(self.value()?.map_or(default, callback))
    }
}
