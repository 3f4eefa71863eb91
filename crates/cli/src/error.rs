//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map ConfigError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit code 2 belongs to clap for usage errors and is never returned here.

use strata_config::ConfigError;

use crate::formatters::InvalidOutputFormat;

/// Structured exit codes for strata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure, including unreadable files.
    GeneralError = 1,

    /// Not found - no layer has the key, or the named layer is not registered.
    ///
    /// Scripts may fall back to a default or check the layer name.
    NotFound = 4,

    /// Validation error - empty key, malformed file, duplicate layer name,
    /// unknown output format.
    ///
    /// Scripts should fix the input and not retry.
    ValidationError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::KeyNotFound { .. } | ConfigError::LayerNotFound { .. } => {
                ExitCode::NotFound
            }

            ConfigError::InvalidArgument { .. }
            | ConfigError::LayerNameCollision { .. }
            | ConfigError::ConfigFileParse { .. }
            | ConfigError::UnsupportedFileFormat { .. }
            | ConfigError::DotenvParse { .. } => ExitCode::ValidationError,

            ConfigError::ImmutableLayer { .. }
            | ConfigError::NoMutableLayer
            | ConfigError::ConfigFileRead { .. }
            | ConfigError::DotenvIo { .. }
            | ConfigError::DotenvUnknown => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if nothing in the chain is recognized.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(config_err);
            }
            if cause.is::<InvalidOutputFormat>() {
                return ExitCode::ValidationError;
            }
        }

        ExitCode::GeneralError
    }
}
