//! Exit codes for the CLI
//!
//! `run` exits with the run state's code (0-2). Errors use the codes below.

use testbridge_core::{BridgeError, ConfigError};
use testbridge_runner::RunnerError;

/// Success
pub const SUCCESS: i32 = 0;

/// Nothing to run
pub const NO_TESTS: i32 = 2;

/// General error
pub const ERROR: i32 = 3;

/// Configuration error
pub const CONFIG_ERROR: i32 = 4;

/// Validation error
pub const VALIDATION_ERROR: i32 = 5;

/// Exit code for an error that ended a command
pub fn for_error(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<RunnerError>() {
        return e.exit_code();
    }
    if let Some(e) = error.downcast_ref::<BridgeError>() {
        return match e {
            BridgeError::Config(_) | BridgeError::Version(_) => CONFIG_ERROR,
            _ => ERROR,
        };
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return CONFIG_ERROR;
    }
    ERROR
}
