//! Integration tests for the `strata` commands.
//!
//! Responsibilities:
//! - Verify layer order: `--set` overrides > environment > files in argument order.
//! - Verify each command's table and JSON output.
//!
//! Invariants:
//! - Every test runs through `strata_cmd()`, so `.env` files are never loaded.

mod common;

use common::{BASE_TOML, file_arg, strata_cmd, write_file};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_get_reads_from_file_layer() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    strata_cmd()
        .args(["--no-env", "--file", &file_arg("base", &base), "get", "db.host"])
        .assert()
        .success()
        .stdout("localhost\n");
}

#[test]
fn test_earlier_file_takes_priority() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);
    let local = write_file(dir.path(), "local.json", r#"{"db": {"host": "db.local"}}"#);

    strata_cmd()
        .args([
            "--no-env",
            "--file",
            &file_arg("local", &local),
            "--file",
            &file_arg("base", &base),
            "get",
            "db.host",
        ])
        .assert()
        .success()
        .stdout("db.local\n");
}

#[test]
fn test_ini_file_layer() {
    let dir = TempDir::new().unwrap();
    let legacy = write_file(dir.path(), "legacy.ini", "[db]\nhost = ini.host\nport = 5433\n");
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    strata_cmd()
        .args([
            "--no-env",
            "--file",
            &file_arg("legacy", &legacy),
            "--file",
            &file_arg("base", &base),
            "resolve",
            "db.port",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("legacy").and(predicate::str::contains("5433")));
}

#[test]
fn test_dotted_key_in_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let dotted = write_file(dir.path(), "dotted.json", r#"{"a.b": 1}"#);

    strata_cmd()
        .args(["--no-env", "--file", &file_arg("dotted", &dotted), "index"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Failed to load file layer 'dotted'"));
}

#[test]
fn test_set_overrides_everything() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    strata_cmd()
        .env("STRATA_IT_DB_PORT", "7000")
        .args([
            "--env-prefix",
            "STRATA_IT",
            "--file",
            &file_arg("base", &base),
            "--set",
            "db.port=6543",
            "resolve",
            "db.port",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("db.port\toverrides\t6543"));
}

#[test]
fn test_environment_beats_files() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    strata_cmd()
        .env("STRATA_IT_DB_HOST", "db.from-env")
        .args([
            "--env-prefix",
            "STRATA_IT",
            "--file",
            &file_arg("base", &base),
            "resolve",
            "db.host",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("db.host\tenv\tdb.from-env"));
}

#[test]
fn test_env_prefix_from_environment_variable() {
    strata_cmd()
        .env("STRATA_ENV_PREFIX", "STRATA_PFX")
        .env("STRATA_PFX_GREETING", "hello")
        .args(["get", "greeting"])
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn test_no_env_hides_environment() {
    strata_cmd()
        .env("STRATA_IT_ONLY_IN_ENV", "x")
        .args(["--no-env", "--env-prefix", "STRATA_IT", "get", "only.in.env"])
        .assert()
        .code(4);
}

#[test]
fn test_get_default_when_missing() {
    strata_cmd()
        .args(["--no-env", "get", "nowhere", "--default", "fallback"])
        .assert()
        .success()
        .stdout("fallback\n");
}

#[test]
fn test_get_in_layer() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    strata_cmd()
        .args([
            "--no-env",
            "--file",
            &file_arg("base", &base),
            "--set",
            "db.host=override",
            "get",
            "db.host",
            "--layer",
            "base",
        ])
        .assert()
        .success()
        .stdout("localhost\n");
}

#[test]
fn test_set_values_are_typed() {
    strata_cmd()
        .args([
            "--no-env",
            "--set",
            "port=8080",
            "--set",
            "name=svc",
            "-o",
            "json",
            "get",
            "port",
        ])
        .assert()
        .success()
        .stdout("8080\n");
}

#[test]
fn test_names_json() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    let output = strata_cmd()
        .args([
            "--no-env",
            "--file",
            &file_arg("base", &base),
            "--set",
            "extra=1",
            "-o",
            "json",
            "names",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let names: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(names, ["db.host", "db.port", "extra", "log.level"]);
}

#[test]
fn test_index_key_first() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    strata_cmd()
        .args([
            "--no-env",
            "--file",
            &file_arg("base", &base),
            "--set",
            "db.host=override",
            "index",
            "--key-first",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Key\tLayer\n"))
        .stdout(predicate::str::contains("db.host\toverrides"))
        .stdout(predicate::str::contains("db.port\tbase"))
        .stdout(predicate::str::contains("db.host\tbase").not());
}

#[test]
fn test_layers_lists_priority_order() {
    let dir = TempDir::new().unwrap();
    let base = write_file(dir.path(), "base.toml", BASE_TOML);

    strata_cmd()
        .args(["--file", &file_arg("base", &base), "layers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\toverrides\tyes\t0"))
        .stdout(predicate::str::contains("2\tenv\tno"))
        .stdout(predicate::str::contains("3\tbase\tno\t3"));
}

#[test]
fn test_missing_file_gives_empty_layer() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    strata_cmd()
        .args(["--no-env", "--file", &file_arg("absent", &missing), "layers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2\tabsent\tno\t0"));
}

#[test]
fn test_help_lists_commands() {
    strata_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("--file"));
}
