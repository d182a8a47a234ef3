//! Write batching — runs a ledger program inside a single LMDB write
//! transaction.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = store.write_batch()?;
//! batch.run(&LedgerOp::ExpectRound(3))?;
//! batch.insert_nullifier(&nullifier)?;
//! batch.put_round(4)?;
//! batch.commit()?;
//! ```
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], all
//! operations are rolled back (the underlying LMDB transaction is aborted).

use heed::RwTxn;

use geopass_store::{LedgerCell, LedgerOp, StoreError};
use geopass_types::{BoundingBox, EventId, Nullifier};

use crate::ledger::{decode_u64, read_cell_in, LmdbLedgerStore};
use crate::LmdbError;

pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    store: &'a LmdbLedgerStore,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(store: &'a LmdbLedgerStore) -> Result<Self, StoreError> {
        let txn = store.env.write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, store })
    }

    /// Execute one program step inside this transaction.
    pub fn run(&mut self, op: &LedgerOp) -> Result<(), StoreError> {
        match op {
            LedgerOp::ExpectUninitialized => {
                if read_cell_in(&self.txn, &self.store.meta_db, LedgerCell::EventId)?.is_some() {
                    return Err(StoreError::AlreadyInitialized);
                }
                Ok(())
            }
            LedgerOp::ExpectRound(expected) => {
                let actual = self.round()?;
                if actual != *expected {
                    return Err(StoreError::Conflict {
                        expected: *expected,
                        actual,
                    });
                }
                Ok(())
            }
            LedgerOp::SetEventId(id) => self.put_event_id(id),
            LedgerOp::SetBoundingBox(bbox) => self.put_bounding_box(bbox),
            LedgerOp::SetRound(round) => self.put_round(*round),
            LedgerOp::InsertNullifier(n) => self.insert_nullifier(n),
        }
    }

    /// Round as seen by this transaction, including uncommitted writes.
    pub fn round(&self) -> Result<u64, StoreError> {
        let bytes = read_cell_in(&self.txn, &self.store.meta_db, LedgerCell::Round)?
            .ok_or(StoreError::NotInitialized)?;
        decode_u64(LedgerCell::Round, &bytes)
    }

    fn put_cell(&mut self, cell: LedgerCell, value: &[u8]) -> Result<(), StoreError> {
        self.store
            .meta_db
            .put(&mut self.txn, cell.key().as_bytes(), value)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    pub fn put_round(&mut self, round: u64) -> Result<(), StoreError> {
        self.put_cell(LedgerCell::Round, &round.to_le_bytes())
    }

    pub fn put_event_id(&mut self, id: &EventId) -> Result<(), StoreError> {
        self.put_cell(LedgerCell::EventId, id.as_bytes())
    }

    pub fn put_bounding_box(&mut self, bbox: &BoundingBox) -> Result<(), StoreError> {
        self.put_cell(LedgerCell::LatMin, &bbox.lat_min.to_le_bytes())?;
        self.put_cell(LedgerCell::LatMax, &bbox.lat_max.to_le_bytes())?;
        self.put_cell(LedgerCell::LonMin, &bbox.lon_min.to_le_bytes())?;
        self.put_cell(LedgerCell::LonMax, &bbox.lon_max.to_le_bytes())
    }

    /// Insert a nullifier, failing with `Duplicate` if it is already stored.
    pub fn insert_nullifier(&mut self, nullifier: &Nullifier) -> Result<(), StoreError> {
        let exists = self
            .store
            .nullifiers_db
            .get(&self.txn, nullifier.as_bytes())
            .map_err(LmdbError::from)?
            .is_some();
        if exists {
            return Err(StoreError::Duplicate(nullifier.to_string()));
        }
        self.store
            .nullifiers_db
            .put(&mut self.txn, nullifier.as_bytes(), &[])
            .map_err(LmdbError::from)?;
        Ok(())
    }

    pub fn put_meta(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.store
            .meta_db
            .put(&mut self.txn, key.as_bytes(), value)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    /// Commit every operation in the batch atomically.
    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
