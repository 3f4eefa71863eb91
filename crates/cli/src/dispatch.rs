//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching registry operation.
//! - Print formatted results to stdout.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Registry assembly (see `registry_context` module).
//!
//! Invariants:
//! - Lookups never mutate the registry.
//! - A missing key without `--default` is an error (exit code 4), not empty output.

use anyhow::{Context, Result};
use strata_config::{ConfigError, IndexOrder, Layer, Registry};

use crate::args::{Cli, Commands};
use crate::formatters::{LayerSummary, OutputFormat, Resolution, get_formatter};
use crate::registry_context::parse_value;

/// Dispatch the parsed command against `registry`.
pub(crate) fn run_command(cli: &Cli, registry: &Registry) -> Result<()> {
    let format: OutputFormat = cli.output.parse()?;
    let formatter = get_formatter(format);

    let output = match &cli.command {
        Commands::Get {
            key,
            layer,
            default,
        } => {
            let mut lookup = registry.lookup(key);
            if let Some(layer) = layer {
                lookup = lookup.in_layer(layer);
            }
            let value = match default {
                Some(raw) => lookup.value_or(parse_value(raw)),
                None => lookup.value().and_then(|found| {
                    found.ok_or_else(|| ConfigError::KeyNotFound { key: key.clone() })
                }),
            }
            .with_context(|| format!("Failed to get '{}'", key))?;
            formatter.format_value(&value)?
        }
        Commands::Resolve { key } => {
            let (layer, value) = registry
                .resolve_with_layer(key)
                .with_context(|| format!("Failed to resolve '{}'", key))?;
            formatter.format_resolution(&Resolution {
                key,
                layer,
                value: &value,
            })?
        }
        Commands::Names => formatter.format_names(&registry.names())?,
        Commands::Index { key_first } => {
            let order = if *key_first {
                IndexOrder::KeyFirst
            } else {
                IndexOrder::LayerFirst
            };
            formatter.format_index(&registry.build_resolution_index(order), order)?
        }
        Commands::Layers => {
            let layers: Vec<LayerSummary> = registry.layers().map(summarize).collect();
            formatter.format_layers(&layers)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn summarize(layer: &(dyn Layer + 'static)) -> LayerSummary {
    LayerSummary {
        name: layer.name().to_string(),
        mutable: layer.is_mutable(),
        keys: layer.names().len(),
    }
}
