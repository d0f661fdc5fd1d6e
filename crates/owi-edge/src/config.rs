//! Driver configuration.
//!
//! Loaded from YAML; every key is optional and unknown keys are rejected:
//!
//! ```yaml
//! vendor_id: 4711      # 0x1267
//! product_id: 0
//! timeout_ms: 1000
//! step_delay_ms: 500
//! ```

use std::path::Path;
use std::time::Duration;

use owi_edge_protocol::{PRODUCT_ID, VENDOR_ID};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which device to open and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArmConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Control-transfer timeout.
    pub timeout_ms: u64,
    /// Pause between routine steps that do not set their own.
    pub step_delay_ms: u64,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            timeout_ms: 1000,
            step_delay_ms: 500,
        }
    }
}

impl ArmConfig {
    /// Parse and validate YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject a zero transfer timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Control-transfer timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Default routine pause as a `Duration`.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn defaults_target_the_arm() {
        let config = ArmConfig::default();
        assert_eq!(config.vendor_id, 0x1267);
        assert_eq!(config.product_id, 0);
        assert_eq!(config.timeout(), Duration::from_secs(1));
        assert_eq!(config.step_delay(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_uses_defaults() -> TestResult {
        let config = ArmConfig::from_yaml_str("{}")?;
        assert_eq!(config, ArmConfig::default());
        Ok(())
    }

    #[test]
    fn partial_override() -> TestResult {
        let config = ArmConfig::from_yaml_str("timeout_ms: 250\nstep_delay_ms: 750\n")?;
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.step_delay_ms, 750);
        assert_eq!(config.vendor_id, VENDOR_ID);
        Ok(())
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = ArmConfig::from_yaml_str("speed: 11\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn zero_timeout_rejected() {
        let result = ArmConfig::from_yaml_str("timeout_ms: 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "timeout_ms",
                ..
            })
        ));
    }

    #[test]
    fn load_from_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("arm.yaml");
        std::fs::write(&path, "vendor_id: 4660\nproduct_id: 22136\n")?;
        let config = ArmConfig::load(&path)?;
        assert_eq!(config.vendor_id, 0x1234);
        assert_eq!(config.product_id, 0x5678);
        Ok(())
    }

    #[test]
    fn load_missing_file_reports_path() {
        let result = ArmConfig::load("/nonexistent/owi/arm.yaml");
        match result {
            Err(ConfigError::Io { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/owi/arm.yaml"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
