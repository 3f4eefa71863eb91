//! Centralized constants for the Strata workspace.
//!
//! Key-shape conventions shared by the layer backends and the CLI live here so
//! the separator rules are defined exactly once.

// =============================================================================
// Key Shape
// =============================================================================

/// Separator between path components of a hierarchical key (`"db.host"`).
pub const KEY_SEPARATOR: char = '.';

/// Separator used in environment variable names (`APP_DB_HOST`).
pub const ENV_SEPARATOR: char = '_';

// =============================================================================
// Environment
// =============================================================================

/// Variable that disables `.env` loading when set to `1` or `true`.
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

// =============================================================================
// Registry
// =============================================================================

/// Name the CLI gives to its command-line override layer.
pub const OVERRIDES_LAYER_NAME: &str = "overrides";

/// Name the CLI gives to its environment layer.
pub const ENV_LAYER_NAME: &str = "env";
