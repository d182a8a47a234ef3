//! Nullable store — thread-safe in-memory ledger storage for testing.

use geopass_store::{
    CellStore, LedgerOp, LedgerStore, MetaStore, NullifierStore, StoreError,
};
use geopass_types::{BoundingBox, EventId, Nullifier};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

#[derive(Clone, Default)]
struct Cells {
    event_id: Option<EventId>,
    bbox: Option<BoundingBox>,
    round: Option<u64>,
    nullifiers: BTreeSet<Nullifier>,
}

impl Cells {
    fn run(&mut self, op: &LedgerOp) -> Result<(), StoreError> {
        match op {
            LedgerOp::ExpectUninitialized => {
                if self.event_id.is_some() {
                    return Err(StoreError::AlreadyInitialized);
                }
            }
            LedgerOp::ExpectRound(expected) => {
                let actual = self.round.ok_or(StoreError::NotInitialized)?;
                if actual != *expected {
                    return Err(StoreError::Conflict {
                        expected: *expected,
                        actual,
                    });
                }
            }
            LedgerOp::SetEventId(id) => self.event_id = Some(*id),
            LedgerOp::SetBoundingBox(bbox) => self.bbox = Some(*bbox),
            LedgerOp::SetRound(round) => self.round = Some(*round),
            LedgerOp::InsertNullifier(n) => {
                if !self.nullifiers.insert(*n) {
                    return Err(StoreError::Duplicate(n.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// An in-memory ledger store.
///
/// `apply` runs the program against a copy of the cells and swaps it in only
/// if every step succeeds.
pub struct NullLedgerStore {
    cells: Mutex<Cells>,
    meta: Mutex<HashMap<String, Vec<u8>>>,
    fail_next: Mutex<Option<String>>,
    applied: Mutex<u64>,
}

impl NullLedgerStore {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(Cells::default()),
            meta: Mutex::new(HashMap::new()),
            fail_next: Mutex::new(None),
            applied: Mutex::new(0),
        }
    }

    /// Make the next `apply` fail with [`StoreError::Backend`] after running
    /// its steps, so the rollback path is exercised.
    pub fn fail_next_apply(&self, message: impl Into<String>) {
        *self.fail_next.lock().unwrap() = Some(message.into());
    }

    /// Number of programs committed.
    pub fn applied_count(&self) -> u64 {
        *self.applied.lock().unwrap()
    }
}

impl Default for NullLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CellStore for NullLedgerStore {
    fn is_initialized(&self) -> Result<bool, StoreError> {
        Ok(self.cells.lock().unwrap().event_id.is_some())
    }

    fn get_round(&self) -> Result<u64, StoreError> {
        self.cells
            .lock()
            .unwrap()
            .round
            .ok_or(StoreError::NotInitialized)
    }

    fn get_event_id(&self) -> Result<EventId, StoreError> {
        self.cells
            .lock()
            .unwrap()
            .event_id
            .ok_or(StoreError::NotInitialized)
    }

    fn get_bounding_box(&self) -> Result<BoundingBox, StoreError> {
        self.cells
            .lock()
            .unwrap()
            .bbox
            .ok_or(StoreError::NotInitialized)
    }
}

impl NullifierStore for NullLedgerStore {
    fn nullifier_exists(&self, nullifier: &Nullifier) -> Result<bool, StoreError> {
        Ok(self.cells.lock().unwrap().nullifiers.contains(nullifier))
    }

    fn nullifier_count(&self) -> Result<u64, StoreError> {
        Ok(self.cells.lock().unwrap().nullifiers.len() as u64)
    }

    fn iter_nullifiers(&self) -> Result<Vec<Nullifier>, StoreError> {
        Ok(self.cells.lock().unwrap().nullifiers.iter().copied().collect())
    }
}

impl LedgerStore for NullLedgerStore {
    fn apply(&self, program: &[LedgerOp]) -> Result<(), StoreError> {
        let mut cells = self.cells.lock().unwrap();
        let mut staged = cells.clone();
        for op in program {
            staged.run(op)?;
        }
        if let Some(message) = self.fail_next.lock().unwrap().take() {
            return Err(StoreError::Backend(message));
        }
        *cells = staged;
        *self.applied.lock().unwrap() += 1;
        Ok(())
    }
}

impl MetaStore for NullLedgerStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.meta
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.get_meta("schema_version") {
            Ok(bytes) => {
                let arr: [u8; 4] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| StoreError::Corruption("schema_version".into()))?;
                Ok(u32::from_le_bytes(arr))
            }
            Err(StoreError::NotFound(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put_meta("schema_version", &version.to_le_bytes())
    }
}
