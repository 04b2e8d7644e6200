//! The vehicle record persisted under its chassis number.

use super::status::VehicleStatus;
use crate::error::ContractError;
use serde::{Deserialize, Serialize};

/// Current state of one vehicle, as stored on the ledger.
///
/// Field names on the wire are fixed by deployed data, including the
/// `registrationExpiryDae` spelling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(rename = "chassisNo")]
    pub chassis_no: String,
    #[serde(rename = "owner")]
    pub owner: String,
    #[serde(rename = "registrationNo")]
    pub registration_no: String,
    #[serde(rename = "registrationExpiryDae")]
    pub registration_expiry: String,
    #[serde(rename = "status")]
    pub status: VehicleStatus,
}

impl VehicleRecord {
    /// A freshly built vehicle held by `manufacturer`.
    pub fn manufactured(chassis_no: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        Self {
            chassis_no: chassis_no.into(),
            owner: manufacturer.into(),
            registration_no: String::new(),
            registration_expiry: String::new(),
            status: VehicleStatus::New,
        }
    }

    /// Whether the vehicle carries a registration.
    pub fn is_registered(&self) -> bool {
        !self.registration_no.is_empty()
    }

    /// Encode for `put_state`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ContractError> {
        serde_json::to_vec(self).map_err(|e| ContractError::Marshal(e.to_string()))
    }

    /// Decode bytes read from the ledger.
    pub fn from_bytes(chassis_no: &str, bytes: &[u8]) -> Result<Self, ContractError> {
        serde_json::from_slice(bytes).map_err(|e| ContractError::Unmarshal {
            chassis_no: chassis_no.to_string(),
            reason: e.to_string(),
        })
    }
}
