//! Output formatters for CLI commands.
//!
//! Provides two output formats: Table (tab-separated, for humans and `cut`)
//! and JSON (pretty-printed, for `jq`).

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::str::FromStr;
use strata_config::{IndexOrder, Value};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Returned for an `--output` value that names no format.
#[derive(Debug, thiserror::Error)]
#[error("Invalid output format: {0}. Valid options: json, table")]
pub struct InvalidOutputFormat(pub String);

impl FromStr for OutputFormat {
    type Err = InvalidOutputFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Where a key's value came from.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution<'a> {
    pub key: &'a str,
    pub layer: &'a str,
    pub value: &'a Value,
}

/// One registered layer, as shown by `strata layers`.
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub mutable: bool,
    pub keys: usize,
}

/// Formatter trait for different output types.
pub trait Formatter {
    /// Format a single value.
    fn format_value(&self, value: &Value) -> Result<String>;

    /// Format a value together with the layer that supplied it.
    fn format_resolution(&self, resolution: &Resolution<'_>) -> Result<String>;

    /// Format a set of keys.
    fn format_names(&self, names: &BTreeSet<String>) -> Result<String>;

    /// Format a resolution index in the given tuple order.
    fn format_index(
        &self,
        index: &BTreeSet<(String, String)>,
        order: IndexOrder,
    ) -> Result<String>;

    /// Format the registered layers.
    fn format_layers(&self, layers: &[LayerSummary]) -> Result<String>;
}

/// Column headers for an index in the given order.
fn index_columns(order: IndexOrder) -> (&'static str, &'static str) {
    match order {
        IndexOrder::LayerFirst => ("layer", "key"),
        IndexOrder::KeyFirst => ("key", "layer"),
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_value(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn format_resolution(&self, resolution: &Resolution<'_>) -> Result<String> {
        Ok(serde_json::to_string_pretty(resolution)?)
    }

    fn format_names(&self, names: &BTreeSet<String>) -> Result<String> {
        Ok(serde_json::to_string_pretty(names)?)
    }

    fn format_index(
        &self,
        index: &BTreeSet<(String, String)>,
        order: IndexOrder,
    ) -> Result<String> {
        let (first, second) = index_columns(order);
        let entries: Vec<serde_json::Value> = index
            .iter()
            .map(|(a, b)| {
                let mut entry = serde_json::Map::new();
                entry.insert(first.to_string(), serde_json::Value::from(a.as_str()));
                entry.insert(second.to_string(), serde_json::Value::from(b.as_str()));
                serde_json::Value::Object(entry)
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    fn format_layers(&self, layers: &[LayerSummary]) -> Result<String> {
        Ok(serde_json::to_string_pretty(layers)?)
    }
}

/// Table formatter.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_value(&self, value: &Value) -> Result<String> {
        Ok(value.to_string())
    }

    fn format_resolution(&self, resolution: &Resolution<'_>) -> Result<String> {
        let mut output = String::from("Key\tLayer\tValue\n");
        output.push_str(&format!(
            "{}\t{}\t{}",
            resolution.key, resolution.layer, resolution.value
        ));
        Ok(output)
    }

    fn format_names(&self, names: &BTreeSet<String>) -> Result<String> {
        if names.is_empty() {
            return Ok("No keys found.".to_string());
        }
        Ok(names.iter().cloned().collect::<Vec<_>>().join("\n"))
    }

    fn format_index(
        &self,
        index: &BTreeSet<(String, String)>,
        order: IndexOrder,
    ) -> Result<String> {
        if index.is_empty() {
            return Ok("No keys found.".to_string());
        }
        let (first, second) = index_columns(order);
        let mut output = format!("{}\t{}", capitalize(first), capitalize(second));
        for (a, b) in index {
            output.push('\n');
            output.push_str(&format!("{}\t{}", a, b));
        }
        Ok(output)
    }

    fn format_layers(&self, layers: &[LayerSummary]) -> Result<String> {
        if layers.is_empty() {
            return Ok("No layers registered.".to_string());
        }
        let mut output = String::from("Priority\tName\tMutable\tKeys");
        for (priority, layer) in layers.iter().enumerate() {
            output.push('\n');
            output.push_str(&format!(
                "{}\t{}\t{}\t{}",
                priority + 1,
                layer.name,
                if layer.mutable { "yes" } else { "no" },
                layer.keys
            ));
        }
        Ok(output)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Get a formatter for the specified output format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}
