//! Shared test utilities for strata integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write config file fixtures into temporary directories.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - `STRATA_*` variables from the host are cleared so they cannot change flags.

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Returns a hermetic `strata` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Flag fallbacks read from the environment are cleared.
pub fn strata_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("strata");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    // Clear potential host leakage
    cmd.env_remove("STRATA_ENV_PREFIX")
        .env_remove("STRATA_OUTPUT")
        .env_remove("RUST_LOG");

    cmd
}

/// Write `content` to `dir/name` and return the path.
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// A `--file` argument value for `path`.
#[allow(dead_code)]
pub fn file_arg(name: &str, path: &Path) -> String {
    format!("{}={}", name, path.display())
}

/// TOML fixture shared by most tests.
#[allow(dead_code)]
pub const BASE_TOML: &str = "[db]\nhost = \"localhost\"\nport = 5432\n\n[log]\nlevel = \"info\"\n";
