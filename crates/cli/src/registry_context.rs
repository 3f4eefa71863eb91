//! Registry assembly from parsed CLI arguments.
//!
//! Responsibilities:
//! - Register the `overrides`, `env` and file layers in priority order.
//! - Apply `--set` overrides through the registry's write routing.
//! - Interpret command-line values (`--set`, `--default`) as typed values.
//!
//! Does NOT handle:
//! - Output formatting or command execution (see `dispatch`).
//!
//! Invariants:
//! - The overrides layer is always present, first, and the only mutable layer.
//! - Duplicate layer names are rejected rather than silently replaced.

use anyhow::{Context, Result};
use strata_config::constants::{ENV_LAYER_NAME, OVERRIDES_LAYER_NAME};
use strata_config::{
    DictLayer, DuplicatePolicy, EnvLayer, FileLayer, KeyStrategy, Registry, Value,
};

use crate::args::Cli;

/// Build the registry described by `cli`.
pub(crate) fn build_registry(cli: &Cli) -> Result<Registry> {
    let mut registry = Registry::new().with_duplicate_policy(DuplicatePolicy::Reject);

    registry.add_layer(
        DictLayer::empty(OVERRIDES_LAYER_NAME)
            .with_strategy(KeyStrategy::Hierarchical)?
            .with_mutable(true),
    )?;

    if !cli.no_env {
        let mut env = EnvLayer::new(ENV_LAYER_NAME);
        if let Some(prefix) = cli.env_prefix.as_deref() {
            env = env.with_prefix(prefix);
        }
        registry.add_layer(env)?;
    }

    for spec in &cli.files {
        let layer = FileLayer::load(spec.name.as_str(), [&spec.path])
            .with_context(|| format!("Failed to load file layer '{}'", spec.name))?;
        if layer.sources().is_empty() {
            tracing::warn!(
                layer = %spec.name,
                path = %spec.path.display(),
                "config file not found; layer is empty"
            );
        }
        registry
            .add_layer(layer)
            .with_context(|| format!("Failed to register file layer '{}'", spec.name))?;
    }

    for (key, raw) in &cli.overrides {
        registry
            .set(key, parse_value(raw))
            .with_context(|| format!("Failed to apply override for '{}'", key))?;
    }

    tracing::debug!(
        layers = ?registry.layer_names().collect::<Vec<_>>(),
        overrides = cli.overrides.len(),
        "assembled registry"
    );
    Ok(registry)
}

/// Read a command-line value as a JSON scalar or document when it is one,
/// otherwise as a plain string.
///
/// `8080` is an integer, `true` a boolean, `[1,2]` a list, `localhost` a string.
pub(crate) fn parse_value(raw: &str) -> Value {
    serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
