//! Verification of a record's history against the transition table.

use super::TimestampFormatter;
use crate::core::{LifecycleTable, VehicleRecord, VehicleStatus};
use crate::ledger::{HistoryOrder, KeyModification};
use serde::Serialize;

/// Content of one version.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Version {
    Record(VehicleRecord),
    Deleted,
    Unreadable(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuditedVersion {
    pub tx_id: String,
    pub timestamp: String,
    pub version: Version,
}

/// Something in a history that the lifecycle rules do not account for.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum AuditFinding {
    /// The first version (or the first after a deletion) is not `New`.
    NotCreatedNew { tx_id: String, status: VehicleStatus },
    /// A `New` version written over a live record.
    Recreated { tx_id: String, from: VehicleStatus },
    /// No rule moves `from` to `to`.
    IllegalTransition {
        tx_id: String,
        from: VehicleStatus,
        to: VehicleStatus,
    },
    /// The stored record names a different chassis number than its key.
    ChassisMismatch { tx_id: String, found: String },
    Deleted { tx_id: String },
    Unreadable { tx_id: String, reason: String },
}

/// The versions of one record in commit order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuditTrail {
    chassis_no: String,
    versions: Vec<AuditedVersion>,
}

impl AuditTrail {
    /// Build a trail from versions as the ledger yielded them.
    /// Newest-first input is reversed; versions are never re-sorted. Bytes
    /// that do not decode as a record become [`Version::Unreadable`].
    pub fn from_modifications(
        chassis_no: &str,
        modifications: impl IntoIterator<Item = KeyModification>,
        formatter: &dyn TimestampFormatter,
        order: HistoryOrder,
    ) -> Self {
        let mut versions: Vec<AuditedVersion> = modifications
            .into_iter()
            .map(|modification| {
                let version = match &modification.value {
                    None => Version::Deleted,
                    Some(bytes) => match VehicleRecord::from_bytes(chassis_no, bytes) {
                        Ok(record) => Version::Record(record),
                        Err(e) => Version::Unreadable(e.to_string()),
                    },
                };
                AuditedVersion {
                    timestamp: formatter.format(&modification.timestamp),
                    tx_id: modification.tx_id,
                    version,
                }
            })
            .collect();
        if order == HistoryOrder::NewestFirst {
            versions.reverse();
        }
        Self {
            chassis_no: chassis_no.to_string(),
            versions,
        }
    }

    pub fn chassis_no(&self) -> &str {
        &self.chassis_no
    }

    pub fn versions(&self) -> &[AuditedVersion] {
        &self.versions
    }

    /// Statuses of the readable versions, oldest first.
    pub fn status_path(&self) -> Vec<VehicleStatus> {
        self.versions
            .iter()
            .filter_map(|v| match &v.version {
                Version::Record(record) => Some(record.status),
                _ => None,
            })
            .collect()
    }

    /// The latest version, if it is a live record.
    pub fn current(&self) -> Option<&VehicleRecord> {
        match &self.versions.last()?.version {
            Version::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Replay every version and report each one the table does not permit.
    /// An empty result means the history is a legal lifecycle.
    pub fn verify(&self, table: &LifecycleTable) -> Vec<AuditFinding> {
        let mut findings = Vec::new();
        let mut previous: Option<VehicleStatus> = None;

        for audited in &self.versions {
            let tx_id = audited.tx_id.clone();
            match &audited.version {
                Version::Deleted => {
                    findings.push(AuditFinding::Deleted { tx_id });
                    previous = None;
                }
                Version::Unreadable(reason) => {
                    findings.push(AuditFinding::Unreadable {
                        tx_id,
                        reason: reason.clone(),
                    });
                }
                Version::Record(record) => {
                    if record.chassis_no != self.chassis_no {
                        findings.push(AuditFinding::ChassisMismatch {
                            tx_id: tx_id.clone(),
                            found: record.chassis_no.clone(),
                        });
                    }
                    match previous {
                        None if record.status != VehicleStatus::New => {
                            findings.push(AuditFinding::NotCreatedNew {
                                tx_id,
                                status: record.status,
                            });
                        }
                        None => {}
                        Some(from) if record.status == VehicleStatus::New => {
                            findings.push(AuditFinding::Recreated { tx_id, from });
                        }
                        Some(from) if !table.permits(from, record.status) => {
                            findings.push(AuditFinding::IllegalTransition {
                                tx_id,
                                from,
                                to: record.status,
                            });
                        }
                        Some(_) => {}
                    }
                    previous = Some(record.status);
                }
            }
        }
        findings
    }
}
