//! Replay of a record's version history.
//!
//! [`HistoryReader`] opens the ledger's history iterator for a chassis number
//! and turns each committed version into a [`HistoryEntry`]. Entries come out
//! in exactly the order the ledger yields them; the reader never sorts.

mod audit;
mod format;

pub use audit::{AuditFinding, AuditTrail, AuditedVersion, Version};
pub use format::{TimestampFormat, TimestampFormatter};

use crate::core::VehicleRecord;
use crate::error::ContractError;
use crate::ledger::{HistoryOrder, KeyModification, Ledger, LedgerError};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::debug;

/// One version of a record as rendered in the history array.
///
/// Wire form: `{"TxId": "...", "Value": {...} | null, "Timestamp": "...", "IsDelete": "false"}`.
/// `Value` is the stored record embedded verbatim.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "TxId")]
    pub tx_id: String,
    #[serde(rename = "Value")]
    pub value: Option<Box<RawValue>>,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "IsDelete", with = "bool_text")]
    pub is_delete: bool,
}

impl HistoryEntry {
    fn from_modification(
        chassis_no: &str,
        modification: KeyModification,
        formatter: &dyn TimestampFormatter,
    ) -> Result<Self, ContractError> {
        let is_delete = modification.is_delete();
        let value = match modification.value {
            Some(bytes) => Some(embed(chassis_no, &modification.tx_id, bytes)?),
            None => None,
        };
        Ok(Self {
            timestamp: formatter.format(&modification.timestamp),
            tx_id: modification.tx_id,
            value,
            is_delete,
        })
    }

    /// Decode the embedded value as a record; `None` for a tombstone.
    pub fn record(&self, chassis_no: &str) -> Result<Option<VehicleRecord>, ContractError> {
        self.value
            .as_ref()
            .map(|raw| VehicleRecord::from_bytes(chassis_no, raw.get().as_bytes()))
            .transpose()
    }
}

fn embed(chassis_no: &str, tx_id: &str, bytes: Vec<u8>) -> Result<Box<RawValue>, ContractError> {
    let unmarshal = |reason: String| ContractError::Unmarshal {
        chassis_no: chassis_no.to_string(),
        reason: format!("version {tx_id}: {reason}"),
    };
    let text = String::from_utf8(bytes).map_err(|e| unmarshal(e.to_string()))?;
    RawValue::from_string(text).map_err(|e| unmarshal(e.to_string()))
}

/// `IsDelete` travels as the text `"true"` / `"false"`.
mod bool_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Reads the history of records from a ledger.
pub struct HistoryReader<'a, L: Ledger> {
    ledger: &'a L,
    formatter: &'a dyn TimestampFormatter,
}

impl<'a, L: Ledger + 'a> HistoryReader<'a, L> {
    pub fn new(ledger: &'a L, formatter: &'a dyn TimestampFormatter) -> Self {
        Self { ledger, formatter }
    }

    /// Lazily yield the versions of `chassis_no`.
    ///
    /// The returned iterator owns the ledger's history handle and releases it
    /// when dropped. It stops after the first error.
    pub fn entries(&self, chassis_no: &str) -> Result<HistoryEntries<'a, L>, ContractError> {
        let inner = self
            .ledger
            .history_for_key(chassis_no)
            .map_err(|e| iterator_error(chassis_no, e))?;
        Ok(HistoryEntries {
            chassis_no: chassis_no.to_string(),
            inner,
            formatter: self.formatter,
            done: false,
        })
    }

    /// Render the full history of `chassis_no` as a JSON array.
    pub fn get_history(&self, chassis_no: &str) -> Result<Vec<u8>, ContractError> {
        let entries = self
            .entries(chassis_no)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(chassis_no, entries = entries.len(), "history rendered");
        serde_json::to_vec(&entries).map_err(|e| ContractError::Marshal(e.to_string()))
    }

    /// Collect the history of `chassis_no` into an audit trail. `order` states
    /// how the ledger orders its history. Versions that are not valid records
    /// are kept in the trail as unreadable rather than failing the audit.
    pub fn audit(&self, chassis_no: &str, order: HistoryOrder) -> Result<AuditTrail, ContractError> {
        let modifications = self
            .ledger
            .history_for_key(chassis_no)
            .and_then(|history| history.collect::<Result<Vec<_>, _>>())
            .map_err(|e| iterator_error(chassis_no, e))?;
        debug!(chassis_no, versions = modifications.len(), "history audited");
        Ok(AuditTrail::from_modifications(
            chassis_no,
            modifications,
            self.formatter,
            order,
        ))
    }
}

fn iterator_error(chassis_no: &str, e: LedgerError) -> ContractError {
    ContractError::HistoryIterator {
        chassis_no: chassis_no.to_string(),
        reason: e.to_string(),
    }
}

/// Iterator returned by [`HistoryReader::entries`].
pub struct HistoryEntries<'a, L: Ledger + 'a> {
    chassis_no: String,
    inner: L::History<'a>,
    formatter: &'a dyn TimestampFormatter,
    done: bool,
}

impl<'a, L: Ledger + 'a> Iterator for HistoryEntries<'a, L> {
    type Item = Result<HistoryEntry, ContractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.inner.next()? {
            Ok(modification) => {
                HistoryEntry::from_modification(&self.chassis_no, modification, self.formatter)
            }
            Err(e) => Err(iterator_error(&self.chassis_no, e)),
        };
        self.done = item.is_err();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LifecycleTable, VehicleStatus};
    use crate::ledger::MemoryLedger;
    use chrono::DateTime;

    fn ledger() -> MemoryLedger {
        MemoryLedger::new().with_start_time(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    }

    fn put(ledger: &mut MemoryLedger, record: &VehicleRecord) {
        ledger
            .put_state(&record.chassis_no, record.to_bytes().unwrap())
            .unwrap();
    }

    #[test]
    fn renders_entries_in_wire_format() {
        let mut ledger = ledger();
        put(&mut ledger, &VehicleRecord::manufactured("CH001", "Manufacturer"));

        let format = TimestampFormat::Ledger;
        let reader = HistoryReader::new(&ledger, &format);
        let json: serde_json::Value =
            serde_json::from_slice(&reader.get_history("CH001").unwrap()).unwrap();

        let entry = &json[0];
        assert_eq!(entry["Value"]["status"], "New");
        assert_eq!(entry["Value"]["owner"], "Manufacturer");
        assert_eq!(entry["Timestamp"], "2023-11-14 22:13:20 +0000 UTC");
        assert_eq!(entry["IsDelete"], "false");
        assert_eq!(entry["TxId"].as_str().unwrap().len(), 32);
    }

    #[test]
    fn value_is_embedded_verbatim() {
        let mut ledger = ledger();
        let record = VehicleRecord::manufactured("CH001", "Manufacturer");
        let stored = String::from_utf8(record.to_bytes().unwrap()).unwrap();
        put(&mut ledger, &record);

        let format = TimestampFormat::Ledger;
        let reader = HistoryReader::new(&ledger, &format);
        let text = String::from_utf8(reader.get_history("CH001").unwrap()).unwrap();

        assert!(text.contains(&format!("\"Value\":{stored}")));
    }

    #[test]
    fn tombstones_render_null() {
        let mut ledger = ledger();
        put(&mut ledger, &VehicleRecord::manufactured("CH001", "Manufacturer"));
        ledger.del_state("CH001").unwrap();

        let format = TimestampFormat::Ledger;
        let reader = HistoryReader::new(&ledger, &format);
        let entries: Vec<HistoryEntry> =
            serde_json::from_slice(&reader.get_history("CH001").unwrap()).unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[1].value.is_none());
        assert!(entries[1].is_delete);
        assert_eq!(entries[1].record("CH001").unwrap(), None);
        assert_eq!(
            entries[0].record("CH001").unwrap().unwrap().status,
            VehicleStatus::New
        );
    }

    #[test]
    fn unknown_key_has_empty_history() {
        let ledger = ledger();
        let format = TimestampFormat::Ledger;
        let reader = HistoryReader::new(&ledger, &format);

        assert_eq!(reader.get_history("nope").unwrap(), b"[]".to_vec());
    }

    #[test]
    fn open_failure_is_history_iterator_error() {
        let mut ledger = ledger();
        ledger.fail_history_open(true);
        let format = TimestampFormat::Ledger;
        let reader = HistoryReader::new(&ledger, &format);

        let err = reader.get_history("CH001").unwrap_err();
        assert!(matches!(err, ContractError::HistoryIterator { .. }));
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn mid_iteration_failure_releases_iterator() {
        let mut ledger = ledger();
        put(&mut ledger, &VehicleRecord::manufactured("CH001", "Manufacturer"));
        put(&mut ledger, &VehicleRecord::manufactured("CH001", "Manufacturer"));
        ledger.fail_history_at(Some(1));

        let format = TimestampFormat::Ledger;
        let reader = HistoryReader::new(&ledger, &format);
        let err = reader.get_history("CH001").unwrap_err();

        assert!(matches!(err, ContractError::HistoryIterator { .. }));
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn entries_stop_after_first_error() {
        let mut ledger = ledger();
        ledger.put_state("CH001", b"garbage".to_vec()).unwrap();
        put(&mut ledger, &VehicleRecord::manufactured("CH001", "Manufacturer"));

        let format = TimestampFormat::Ledger;
        let reader = HistoryReader::new(&ledger, &format);
        let mut entries = reader.entries("CH001").unwrap();

        assert!(matches!(
            entries.next(),
            Some(Err(ContractError::Unmarshal { .. }))
        ));
        assert!(entries.next().is_none());
        drop(entries);
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn audit_keeps_undecodable_versions() {
        let mut ledger = ledger();
        put(&mut ledger, &VehicleRecord::manufactured("CH001", "Manufacturer"));
        ledger.put_state("CH001", b"garbage".to_vec()).unwrap();
        put(
            &mut ledger,
            &VehicleRecord {
                status: VehicleStatus::Dealer,
                ..VehicleRecord::manufactured("CH001", "DealerA")
            },
        );

        let format = TimestampFormat::Ledger;
        let reader = HistoryReader::new(&ledger, &format);
        assert!(matches!(
            reader.get_history("CH001"),
            Err(ContractError::Unmarshal { .. })
        ));

        let trail = reader.audit("CH001", HistoryOrder::OldestFirst).unwrap();
        assert_eq!(trail.versions().len(), 3);
        assert!(matches!(trail.versions()[1].version, Version::Unreadable(_)));
        assert!(matches!(
            trail.verify(&LifecycleTable::standard()).as_slice(),
            [AuditFinding::Unreadable { .. }]
        ));
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn custom_formatter_is_used() {
        let mut ledger = ledger();
        put(&mut ledger, &VehicleRecord::manufactured("CH001", "Manufacturer"));

        let format = TimestampFormat::EpochSeconds;
        let reader = HistoryReader::new(&ledger, &format);
        let entry = reader.entries("CH001").unwrap().next().unwrap().unwrap();

        assert_eq!(entry.timestamp, "1700000000");
    }
}
