//! Integration tests for structured exit codes.
//!
//! These tests verify that strata returns the correct exit codes
//! for different error scenarios, enabling reliable shell scripting.

mod common;

use common::{BASE_TOML, file_arg, strata_cmd, write_file};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_success_returns_exit_code_0() {
    strata_cmd().args(["--no-env", "names"]).assert().code(0);
}

#[test]
fn test_missing_key_returns_exit_code_4() {
    strata_cmd()
        .args(["--no-env", "get", "nowhere"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_missing_layer_returns_exit_code_4() {
    strata_cmd()
        .args(["--no-env", "get", "db.host", "--layer", "nope", "--default", "x"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Layer 'nope' is not registered"));
}

#[test]
fn test_empty_key_returns_exit_code_5() {
    strata_cmd()
        .args(["--no-env", "resolve", ""])
        .assert()
        .code(5);
}

#[test]
fn test_malformed_file_returns_exit_code_5() {
    let dir = TempDir::new().unwrap();
    let broken = write_file(dir.path(), "broken.json", "{ not json");

    strata_cmd()
        .args(["--no-env", "--file", &file_arg("broken", &broken), "names"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Failed to load file layer 'broken'"));
}

#[test]
fn test_unsupported_extension_returns_exit_code_5() {
    let dir = TempDir::new().unwrap();
    let yaml = write_file(dir.path(), "settings.yaml", "a:\n  b: 1\n");

    strata_cmd()
        .args(["--no-env", "--file", &file_arg("yaml", &yaml), "names"])
        .assert()
        .code(5);
}

#[test]
fn test_duplicate_layer_name_returns_exit_code_5() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    strata_cmd()
        .args(["--file", &file_arg("env", &base), "names"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("already registered"));
}

#[test]
fn test_override_through_scalar_returns_exit_code_5() {
    strata_cmd()
        .args(["--no-env", "--set", "db=1", "--set", "db.host=x", "names"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Failed to apply override for 'db.host'"));
}

#[test]
fn test_invalid_output_format_returns_exit_code_5() {
    strata_cmd()
        .args(["--no-env", "-o", "yaml", "names"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid output format"));
}

#[test]
fn test_usage_error_returns_clap_exit_code_2() {
    strata_cmd()
        .args(["--file", "no-equals-sign", "names"])
        .assert()
        .code(2);
}
