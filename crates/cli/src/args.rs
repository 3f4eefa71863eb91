//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse `NAME=PATH` file layers and `KEY=VALUE` overrides.
//!
//! Non-responsibilities:
//! - Does not build the registry (see `registry_context` module).
//! - Does not execute commands (see `dispatch` module).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Strata - Inspect layered configuration from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Layers are consulted in this order: --set overrides, environment, then each --file as given.\n\nExamples:\n  strata --file base=config.toml get db.host\n  strata --env-prefix APP --file base=config.toml resolve db.port\n  strata --set log.level=debug --file app=app.json index --key-first\n  strata --no-env -o json names\n"
)]
pub struct Cli {
    /// Config file layer as NAME=PATH (repeatable; earlier files take priority)
    #[arg(short = 'f', long = "file", global = true, value_name = "NAME=PATH", value_parser = parse_file_spec)]
    pub files: Vec<FileSpec>,

    /// Only expose environment variables starting with PREFIX_ (prefix is stripped)
    #[arg(long, global = true, env = "STRATA_ENV_PREFIX")]
    pub env_prefix: Option<String>,

    /// Do not register the environment layer
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Override KEY with VALUE in the highest-priority layer (repeatable)
    #[arg(short = 's', long = "set", global = true, value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    /// Output format (table, json)
    #[arg(short, long, global = true, env = "STRATA_OUTPUT", default_value = "table")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value of a key
    Get {
        /// Dot-separated key (e.g., db.host)
        key: String,

        /// Only consult this layer
        #[arg(short, long)]
        layer: Option<String>,

        /// Value to print when no layer has the key
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Print the value of a key and the layer that supplied it
    Resolve {
        /// Dot-separated key (e.g., db.host)
        key: String,
    },

    /// List every key known to any layer
    Names,

    /// Show which layer answers each key
    Index {
        /// Order entries as (key, layer) instead of (layer, key)
        #[arg(long)]
        key_first: bool,
    },

    /// List registered layers, highest priority first
    Layers,
}

/// A `--file NAME=PATH` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub name: String,
    pub path: PathBuf,
}

fn parse_file_spec(s: &str) -> Result<FileSpec, String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{}'", s))?;
    let name = name.trim();
    let path = path.trim();
    if name.is_empty() {
        return Err(format!("layer name must not be empty in '{}'", s));
    }
    if path.is_empty() {
        return Err(format!("file path must not be empty in '{}'", s));
    }
    Ok(FileSpec {
        name: name.to_string(),
        path: PathBuf::from(path),
    })
}

fn parse_override(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("key must not be empty in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_spec() {
        let spec = parse_file_spec("base=conf/app.toml").unwrap();
        assert_eq!(spec.name, "base");
        assert_eq!(spec.path, PathBuf::from("conf/app.toml"));
    }

    #[test]
    fn test_parse_file_spec_keeps_equals_in_path() {
        let spec = parse_file_spec("odd=dir=x/app.json").unwrap();
        assert_eq!(spec.name, "odd");
        assert_eq!(spec.path, PathBuf::from("dir=x/app.json"));
    }

    #[test]
    fn test_parse_file_spec_rejects_missing_parts() {
        assert!(parse_file_spec("app.toml").is_err());
        assert!(parse_file_spec("=app.toml").is_err());
        assert!(parse_file_spec("base=  ").is_err());
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("db.port=6543").unwrap(),
            ("db.port".to_string(), "6543".to_string())
        );
        assert_eq!(
            parse_override("greeting=a=b").unwrap(),
            ("greeting".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_override("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_override("novalue").is_err());
        assert!(parse_override(" =x").is_err());
    }

    #[test]
    fn test_cli_parses_global_layers_after_subcommand() {
        let cli = Cli::try_parse_from([
            "strata",
            "get",
            "db.host",
            "--file",
            "base=app.toml",
            "--set",
            "db.host=x",
            "--no-env",
        ])
        .unwrap();
        assert_eq!(cli.files.len(), 1);
        assert_eq!(cli.overrides, vec![("db.host".to_string(), "x".to_string())]);
        assert!(cli.no_env);
        assert!(matches!(cli.command, Commands::Get { ref key, .. } if key == "db.host"));
    }
}
