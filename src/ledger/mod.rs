//! The ledger the contract runs against.
//!
//! The contract never owns storage. It is handed something implementing
//! [`Ledger`]: atomic get/put by key plus the ordered version history of a
//! key. Replication, ordering and commit-time conflict detection all belong
//! to the implementation behind this trait.

mod memory;
pub mod snapshot;

pub use memory::{HistoryOrder, MemoryHistory, MemoryLedger};
pub use snapshot::{LedgerSnapshot, SnapshotError, SNAPSHOT_VERSION};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by a ledger implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("history iterator failed: {0}")]
    Iterator(String),

    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

/// One committed version of a key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyModification {
    /// Identifier the ledger assigned to the committing transaction.
    pub tx_id: String,
    /// Stored bytes, or `None` for a tombstone.
    pub value: Option<Vec<u8>>,
    /// Commit time as recorded by the ledger.
    pub timestamp: DateTime<Utc>,
}

impl KeyModification {
    pub fn is_delete(&self) -> bool {
        self.value.is_none()
    }
}

/// Versioned key-value store consumed by the contract.
///
/// History iterators are scoped resources: dropping one releases it, so a
/// consumer that stops early (or bails out with `?`) never leaks a handle.
pub trait Ledger {
    /// Iterator over the versions of one key, in the order the store chooses.
    type History<'a>: Iterator<Item = Result<KeyModification, LedgerError>> + 'a
    where
        Self: 'a;

    /// Current bytes for `key`, `None` if never written or deleted.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write a new version of `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Open the version history of `key`.
    fn history_for_key(&self, key: &str) -> Result<Self::History<'_>, LedgerError>;
}
