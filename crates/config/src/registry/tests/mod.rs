//! Tests for the layer registry.
//!
//! Responsibilities:
//! - Test precedence resolution and `get`-style lookups.
//! - Test layer management (add, insert, remove) and write routing.
//! - Test the resolution index.
//!
//! Does NOT handle:
//! - Per-backend key handling (tested next to each layer).
//!
//! Invariants:
//! - Tests build registries from in-memory layers only; no environment or
//!   filesystem access.

use crate::error::{ConfigError, Result};
use crate::layer::{DictLayer, KeyStrategy, Layer};
use crate::registry::Registry;
use crate::value::Value;
use std::collections::BTreeSet;


/// `alpha`, `beta`, `gamma`, highest priority first.
pub fn layered() -> Registry {
    Registry::with_layers([
        boxed(DictLayer::new(
            "alpha",
            [("shared", "from-alpha"), ("alpha_only", "a")],
        )),
        boxed(DictLayer::new(
            "beta",
            [("shared", "from-beta"), ("beta_only", "b")],
        )),
        boxed(DictLayer::new(
            "gamma",
            [("shared", "from-gamma"), ("gamma_only", "g")],
        )),
    ])
}

/// `alpha`, `beta`, `gamma` with secrets split across the lower layers.
pub fn secrets() -> Registry {
    Registry::with_layers([
        boxed(DictLayer::new(
            "alpha",
            [("test_key", "A"), ("unique", "0123456789")],
        )),
        boxed(DictLayer::new(
            "beta",
            [("test_key", "B"), ("beta_secret", "fghij")],
        )),
        boxed(DictLayer::new(
            "gamma",
            [
                ("test_key", "G"),
                ("beta_secret", "klmno"),
                ("gamma_secret", "gr!"),
            ],
        )),
    ])
}

pub fn boxed(layer: impl Layer + 'static) -> Box<dyn Layer> {
    Box::new(layer)
}

/// A writable hierarchical layer with no data.
pub fn scratch(name: &str) -> DictLayer {
    DictLayer::empty(name)
        .with_strategy(KeyStrategy::Hierarchical)
        .unwrap()
        .with_mutable(true)
}

pub fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A layer whose every lookup fails with something other than "not found".
pub struct BrokenLayer;

impl Layer for BrokenLayer {
    fn name(&self) -> &str {
        "broken"
    }

    fn fetch(&self, _key: &str) -> Result<Value> {
        Err(ConfigError::invalid_argument("backend unavailable"))
    }

    fn names(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }
}
