//! Contract configuration.

use crate::builder::BuildError;
use crate::history::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Owner written into every newly created record unless configured otherwise.
pub const DEFAULT_MANUFACTURER: &str = "Manufacturer";

/// What `create` does when the chassis number already has a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatePolicy {
    /// Write a fresh `New` version over the existing one.
    #[default]
    Overwrite,
    /// Fail with `AlreadyExists`.
    Reject,
}

/// Settings shared by the engine and the history reader.
///
/// Loadable from JSON; missing fields take their defaults.
///
/// ```
/// use vlm::config::{CreatePolicy, EngineConfig};
///
/// let config = EngineConfig::from_json(r#"{"manufacturer":"Maruti","create_policy":"reject"}"#).unwrap();
/// assert_eq!(config.manufacturer, "Maruti");
/// assert_eq!(config.create_policy, CreatePolicy::Reject);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub manufacturer: String,
    pub create_policy: CreatePolicy,
    pub timestamp_format: TimestampFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            manufacturer: DEFAULT_MANUFACTURER.to_string(),
            create_policy: CreatePolicy::default(),
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BuildError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.manufacturer.trim().is_empty() {
            return Err(BuildError::EmptyManufacturer);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployed_behavior() {
        let config = EngineConfig::default();

        assert_eq!(config.manufacturer, DEFAULT_MANUFACTURER);
        assert_eq!(config.create_policy, CreatePolicy::Overwrite);
        assert_eq!(config.timestamp_format, TimestampFormat::Ledger);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn blank_manufacturer_is_rejected() {
        let err = EngineConfig::from_json(r#"{"manufacturer":"  "}"#).unwrap_err();
        assert!(matches!(err, BuildError::EmptyManufacturer));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = EngineConfig::from_json(r#"{"create_policy":"sometimes"}"#).unwrap_err();
        assert!(matches!(err, BuildError::InvalidConfig(_)));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = EngineConfig {
            manufacturer: "Maruti".to_string(),
            create_policy: CreatePolicy::Reject,
            timestamp_format: TimestampFormat::EpochMillis,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
