//! Error types for owictl CLI

use owi_edge::{ArmError, ConfigError, TransportError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Process exit code for an error returned by a command.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(err) = error.downcast_ref::<ArmError>() {
        return match err {
            ArmError::DeviceNotFound { .. } => 2,
            ArmError::Transport(TransportError::Disconnected) => 2,
            ArmError::Transport(_) => 3,
            ArmError::Motion(_) => 4,
        };
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return 4;
    }
    match error.downcast_ref::<CliError>() {
        Some(CliError::InvalidInput(_)) => 4,
        _ => 1,
    }
}

/// Short machine-readable name used in JSON error output.
pub fn error_type_name(error: &anyhow::Error) -> &'static str {
    if let Some(err) = error.downcast_ref::<ArmError>() {
        return match err {
            ArmError::DeviceNotFound { .. } => "device_not_found",
            ArmError::Transport(_) => "transport",
            ArmError::Motion(_) => "invalid_motion",
        };
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return "config";
    }
    match error.downcast_ref::<CliError>() {
        Some(CliError::InvalidInput(_)) => "invalid_input",
        None => "unknown",
    }
}
