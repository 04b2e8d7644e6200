//! Snapshots of a [`MemoryLedger`].
//!
//! A snapshot captures every version of every key so a simulated ledger can
//! be persisted and restored with its full history intact. Two encodings are
//! offered: JSON for inspection, bincode for compact storage.

use super::{KeyModification, MemoryLedger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur while encoding or restoring snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Snapshot validation failed: {0}")]
    ValidationFailed(String),
}

/// Full contents of a ledger, history included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Versions per key, oldest first
    pub keys: BTreeMap<String, Vec<KeyModification>>,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if let Some((key, _)) = self.keys.iter().find(|(_, versions)| versions.is_empty()) {
            return Err(SnapshotError::ValidationFailed(format!(
                "key '{key}' has no versions"
            )));
        }
        if self.keys.contains_key("") {
            return Err(SnapshotError::ValidationFailed("empty key".to_string()));
        }
        Ok(())
    }
}

impl MemoryLedger {
    /// Capture every version of every key.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            keys: self.versions.clone(),
        }
    }

    /// Rebuild a ledger from a snapshot. Clock, order and faults start at
    /// their defaults.
    pub fn restore(snapshot: LedgerSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        Ok(Self::from_versions(snapshot.keys))
    }
}
