//! Ordered layer registry and precedence resolution.
//!
//! Responsibilities:
//! - Own the registered layers in priority order (index 0 is consulted first).
//! - Resolve keys against layers front-to-back, stopping at the first hit.
//! - Route writes to the first mutable layer.
//! - Enumerate keys and build the resolution index (see `index.rs`).
//!
//! Does NOT handle:
//! - How any single layer stores or finds values (see `layer`).
//! - Locking. Share a registry across threads behind your own mutex.
//!
//! Invariants:
//! - Layer names are unique within a registry.
//! - Empty keys are rejected with `InvalidArgument` before any layer is consulted.
//! - Only `KeyNotFound` from a layer moves the scan on to the next layer; any
//!   other layer error aborts the lookup.
//! - Failed `add_layers`/`insert_layers` calls leave the registry unchanged.

mod index;
mod lookup;

#[cfg(test)]
mod tests;

pub use index::IndexOrder;
pub use lookup::Lookup;

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ConfigError, Result};
use crate::layer::{Layer, LayerWrite};
use crate::value::Value;

/// What `add_layers` does when a name is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Replace the registered layer, keeping its position.
    #[default]
    Replace,
    /// Fail with `LayerNameCollision` and add nothing.
    Reject,
}

/// An ordered collection of layers with precedence lookup.
#[derive(Default)]
pub struct Registry {
    layers: Vec<Box<dyn Layer>>,
    duplicate_policy: DuplicatePolicy,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("layers", &self.layer_names().collect::<Vec<_>>())
            .field("duplicate_policy", &self.duplicate_policy)
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from layers listed highest priority first.
    ///
    /// A later layer with an already-seen name replaces the earlier one.
    pub fn with_layers(layers: impl IntoIterator<Item = Box<dyn Layer>>) -> Self {
        let mut registry = Self::new();
        for layer in layers {
            registry.push_or_replace(layer);
        }
        registry
    }

    /// Set how `add_layers` treats duplicate names.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    // ------------------------------------------------------------------
    // Layer management
    // ------------------------------------------------------------------

    /// Append one layer at the lowest priority.
    pub fn add_layer<L: Layer + 'static>(&mut self, layer: L) -> Result<()> {
        self.add_layers([Box::new(layer) as Box<dyn Layer>])
    }

    /// Append layers at the lowest priority, in the order given.
    ///
    /// Name collisions follow the registry's [`DuplicatePolicy`].
    pub fn add_layers(&mut self, layers: impl IntoIterator<Item = Box<dyn Layer>>) -> Result<()> {
        let incoming: Vec<Box<dyn Layer>> = layers.into_iter().collect();

        if self.duplicate_policy == DuplicatePolicy::Reject {
            let collisions = self.collisions(&incoming);
            if !collisions.is_empty() {
                return Err(ConfigError::LayerNameCollision { names: collisions });
            }
        }

        for layer in incoming {
            self.push_or_replace(layer);
        }
        Ok(())
    }

    /// Insert layers at the highest priority, keeping their relative order.
    ///
    /// With `raise_on_replace`, any name that is already registered (or repeated
    /// within `layers`) fails the call with `LayerNameCollision` and nothing is
    /// inserted. Without it, a replaced layer is dropped from its old position
    /// and its replacement sits at the front with the rest of the batch.
    pub fn insert_layers(
        &mut self,
        layers: impl IntoIterator<Item = Box<dyn Layer>>,
        raise_on_replace: bool,
    ) -> Result<()> {
        let incoming: Vec<Box<dyn Layer>> = layers.into_iter().collect();

        if raise_on_replace {
            let collisions = self.collisions(&incoming);
            if !collisions.is_empty() {
                return Err(ConfigError::LayerNameCollision { names: collisions });
            }
        }

        let mut front: Vec<Box<dyn Layer>> = Vec::with_capacity(incoming.len());
        for layer in incoming {
            match front.iter().position(|l| l.name() == layer.name()) {
                Some(pos) => front[pos] = layer,
                None => front.push(layer),
            }
        }

        let before = self.layers.len();
        self.layers
            .retain(|existing| !front.iter().any(|l| l.name() == existing.name()));
        let replaced = before - self.layers.len();

        tracing::debug!(
            layers = ?front.iter().map(|l| l.name()).collect::<Vec<_>>(),
            replaced,
            "inserted layers at front"
        );

        front.append(&mut self.layers);
        self.layers = front;
        Ok(())
    }

    /// Remove the layer called `name` and hand it back.
    ///
    /// When the layer is absent this is `Ok(None)` if `error_ok`, otherwise
    /// `LayerNotFound`.
    pub fn remove_layer(&mut self, name: &str, error_ok: bool) -> Result<Option<Box<dyn Layer>>> {
        match self.position(name) {
            Some(pos) => {
                tracing::debug!(layer = %name, "removed layer");
                Ok(Some(self.layers.remove(pos)))
            }
            None if error_ok => Ok(None),
            None => Err(ConfigError::layer_not_found(name)),
        }
    }

    /// True if a layer called `name` is registered. This is about layer names,
    /// not configuration keys.
    pub fn has_layer(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// The layer called `name`.
    pub fn layer(&self, name: &str) -> Result<&dyn Layer> {
        self.position(name)
            .map(|pos| self.layers[pos].as_ref())
            .ok_or_else(|| ConfigError::layer_not_found(name))
    }

    /// Mutable access to the layer called `name`.
    pub fn layer_mut(&mut self, name: &str) -> Result<&mut (dyn Layer + 'static)> {
        match self.position(name) {
            Some(pos) => Ok(self.layers[pos].as_mut()),
            None => Err(ConfigError::layer_not_found(name)),
        }
    }

    /// Registered layer names, highest priority first.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|l| l.name())
    }

    /// Registered layers, highest priority first.
    pub fn layers(&self) -> impl Iterator<Item = &(dyn Layer + 'static)> + '_ {
        self.layers.iter().map(|l| l.as_ref())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Value of `key` from the highest-priority layer that has it.
    ///
    /// # Errors
    /// - `InvalidArgument` for an empty key
    /// - `KeyNotFound` if no layer has `key`
    pub fn resolve(&self, key: &str) -> Result<Value> {
        self.resolve_with_layer(key).map(|(_, value)| value)
    }

    /// Like [`Registry::resolve`], also naming the layer that answered.
    pub fn resolve_with_layer(&self, key: &str) -> Result<(&str, Value)> {
        validate_key(key)?;
        for layer in &self.layers {
            match layer.fetch(key) {
                Ok(value) => {
                    tracing::trace!(key = %key, layer = %layer.name(), "resolved key");
                    return Ok((layer.name(), value));
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ConfigError::key_not_found(key))
    }

    /// Start a `get`-style lookup that can be scoped, defaulted or mapped.
    pub fn lookup<'a>(&'a self, key: &'a str) -> Lookup<'a> {
        Lookup::new(self, key)
    }

    /// Value of `key`, or `None` when no layer has it.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.lookup(key).value()
    }

    /// Value of `key`, or `default` when no layer has it.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Result<Value> {
        self.lookup(key).value_or(default)
    }

    /// Union of every layer's keys.
    pub fn names(&self) -> BTreeSet<String> {
        self.layers.iter().flat_map(|l| l.names()).collect()
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Store `value` at `key` in the first mutable layer.
    ///
    /// A higher-priority read-only layer that also defines `key` keeps
    /// shadowing it for `resolve`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        validate_key(key)?;
        let writer = self.first_writer()?;
        tracing::debug!(key = %key, layer = %writer.name(), "storing value");
        writer.store(key, value.into())
    }

    /// Get-or-set on the first mutable layer.
    ///
    /// Returns the value already stored there, or stores and returns `default`.
    /// Fails with `NoMutableLayer` when no layer accepts writes.
    pub fn set_default(&mut self, key: &str, default: impl Into<Value>) -> Result<Value> {
        validate_key(key)?;
        let writer = self.first_writer()?;
        writer.store_default(key, default.into())
    }

    // ------------------------------------------------------------------
    // Resolution index
    // ------------------------------------------------------------------

    /// For every known key, the one layer that answers it, as `(layer, key)` or
    /// `(key, layer)` pairs depending on `order`.
    pub fn build_resolution_index(&self, order: IndexOrder) -> BTreeSet<(String, String)> {
        index::build(&self.layers, order)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn position(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name() == name)
    }

    fn push_or_replace(&mut self, layer: Box<dyn Layer>) {
        match self.position(layer.name()) {
            Some(pos) => {
                tracing::debug!(layer = %layer.name(), "replaced layer in place");
                self.layers[pos] = layer;
            }
            None => {
                tracing::debug!(layer = %layer.name(), "added layer");
                self.layers.push(layer);
            }
        }
    }

    /// Names in `incoming` that are already registered or repeated in the batch.
    fn collisions(&self, incoming: &[Box<dyn Layer>]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut collisions = Vec::new();
        for layer in incoming {
            let name = layer.name();
            let repeated = !seen.insert(name);
            if (repeated || self.has_layer(name)) && !collisions.iter().any(|c| c == name) {
                collisions.push(name.to_string());
            }
        }
        collisions
    }

    fn first_writer(&mut self) -> Result<&mut dyn LayerWrite> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.is_mutable())
            .ok_or(ConfigError::NoMutableLayer)?;
        let name = layer.name().to_string();
        layer
            .writer()
            .ok_or(ConfigError::ImmutableLayer { name })
    }
}

/// Reject keys no layer could sensibly answer.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ConfigError::invalid_argument(
            "configuration key must not be empty",
        ));
    }
    Ok(())
}
