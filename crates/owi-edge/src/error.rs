//! Error types for the arm driver.

use std::path::PathBuf;

use owi_edge_protocol::MotionError;
use thiserror::Error;

/// Failure reported by a control-transfer transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[cfg(feature = "usb")]
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    #[error("short control transfer: wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    #[error("Device disconnected")]
    Disconnected,
}

/// Errors surfaced by [`OwiEdge`](crate::OwiEdge) operations.
#[derive(Error, Debug)]
pub enum ArmError {
    #[error(
        "Unable to connect to your robot arm ({vendor_id:04x}:{product_id:04x})! Check power and connection."
    )]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("command transfer failed: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Motion(#[from] MotionError),
}

impl ArmError {
    /// Create a device-not-found error.
    pub fn not_found(vendor_id: u16, product_id: u16) -> Self {
        ArmError::DeviceNotFound {
            vendor_id,
            product_id,
        }
    }

    /// Check if this error means the arm cannot be reached at all.
    pub fn is_device_unavailable(&self) -> bool {
        matches!(
            self,
            ArmError::DeviceNotFound { .. } | ArmError::Transport(TransportError::Disconnected)
        )
    }
}

/// Errors loading configuration or routine files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
