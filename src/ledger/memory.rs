//! In-memory ledger with full per-key version history.

use super::{KeyModification, Ledger, LedgerError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Order in which history iterators yield versions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}

#[derive(Clone, Debug)]
enum LedgerClock {
    System,
    /// Deterministic: each commit takes `next` and advances it by one second.
    Stepped { next: DateTime<Utc> },
}

#[derive(Clone, Debug, Default)]
struct Faults {
    fail_history_open: bool,
    fail_history_at: Option<usize>,
}

/// Ledger keeping every version of every key in memory.
///
/// Every write appends a version with a fresh transaction id; nothing is ever
/// overwritten. Used as the store for tests and local simulation.
///
/// ```
/// use vlm::ledger::{Ledger, MemoryLedger};
///
/// let mut ledger = MemoryLedger::new();
/// ledger.put_state("CH001", b"v1".to_vec()).unwrap();
/// ledger.put_state("CH001", b"v2".to_vec()).unwrap();
///
/// assert_eq!(ledger.get_state("CH001").unwrap(), Some(b"v2".to_vec()));
/// assert_eq!(ledger.history_for_key("CH001").unwrap().count(), 2);
/// ```
#[derive(Debug)]
pub struct MemoryLedger {
    pub(super) versions: BTreeMap<String, Vec<KeyModification>>,
    order: HistoryOrder,
    clock: LedgerClock,
    faults: Faults,
    open_iterators: Arc<AtomicUsize>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            versions: BTreeMap::new(),
            order: HistoryOrder::default(),
            clock: LedgerClock::System,
            faults: Faults::default(),
            open_iterators: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stamp commits deterministically, starting at `start`, one second apart.
    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.clock = LedgerClock::Stepped { next: start };
        self
    }

    /// Yield history in `order`.
    pub fn with_history_order(mut self, order: HistoryOrder) -> Self {
        self.order = order;
        self
    }

    pub fn history_order(&self) -> HistoryOrder {
        self.order
    }

    /// Make the next `history_for_key` calls fail to open.
    pub fn fail_history_open(&mut self, fail: bool) {
        self.faults.fail_history_open = fail;
    }

    /// Make history iterators fail when reaching the entry at `index`.
    pub fn fail_history_at(&mut self, index: Option<usize>) {
        self.faults.fail_history_at = index;
    }

    /// Number of history iterators currently alive.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Number of versions recorded for `key`, tombstones included.
    pub fn version_count(&self, key: &str) -> usize {
        self.versions.get(key).map_or(0, Vec::len)
    }

    /// All keys ever written.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// Write a tombstone for `key`.
    pub fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        self.append(key, None)
    }

    fn append(&mut self, key: &str, value: Option<Vec<u8>>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::InvalidKey(key.to_string()));
        }
        let modification = KeyModification {
            tx_id: Uuid::new_v4().simple().to_string(),
            value,
            timestamp: self.tick(),
        };
        debug!(
            key,
            tx_id = %modification.tx_id,
            delete = modification.is_delete(),
            "ledger commit"
        );
        self.versions
            .entry(key.to_string())
            .or_default()
            .push(modification);
        Ok(())
    }

    fn tick(&mut self) -> DateTime<Utc> {
        match &mut self.clock {
            LedgerClock::System => Utc::now(),
            LedgerClock::Stepped { next } => {
                let now = *next;
                *next = now + Duration::seconds(1);
                now
            }
        }
    }

    pub(super) fn from_versions(versions: BTreeMap<String, Vec<KeyModification>>) -> Self {
        Self {
            versions,
            ..Self::new()
        }
    }
}

impl Ledger for MemoryLedger {
    type History<'a> = MemoryHistory
    where
        Self: 'a;

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self
            .versions
            .get(key)
            .and_then(|versions| versions.last())
            .and_then(|latest| latest.value.clone()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.append(key, Some(value))
    }

    fn history_for_key(&self, key: &str) -> Result<MemoryHistory, LedgerError> {
        if self.faults.fail_history_open {
            return Err(LedgerError::Unavailable(format!(
                "cannot open history for {key}"
            )));
        }
        let mut entries = self.versions.get(key).cloned().unwrap_or_default();
        if self.order == HistoryOrder::NewestFirst {
            entries.reverse();
        }
        Ok(MemoryHistory {
            entries: entries.into_iter(),
            position: 0,
            fail_at: self.faults.fail_history_at,
            exhausted: false,
            _handle: IteratorHandle::acquire(&self.open_iterators),
        })
    }
}

/// Counts itself in the owning ledger for as long as it lives.
#[derive(Debug)]
struct IteratorHandle(Arc<AtomicUsize>);

impl IteratorHandle {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for IteratorHandle {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// History iterator handed out by [`MemoryLedger`].
#[derive(Debug)]
pub struct MemoryHistory {
    entries: std::vec::IntoIter<KeyModification>,
    position: usize,
    fail_at: Option<usize>,
    exhausted: bool,
    _handle: IteratorHandle,
}

impl Iterator for MemoryHistory {
    type Item = Result<KeyModification, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if self.fail_at == Some(self.position) {
            self.exhausted = true;
            return Some(Err(LedgerError::Iterator(format!(
                "read failed at entry {}",
                self.position
            ))));
        }
        let next = self.entries.next();
        if next.is_none() {
            self.exhausted = true;
        }
        self.position += 1;
        next.map(Ok)
    }
}
