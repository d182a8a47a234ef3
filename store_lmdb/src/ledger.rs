//! LMDB implementation of the ledger cell and nullifier stores.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use geopass_store::{
    CellStore, LedgerCell, LedgerOp, LedgerStore, NullifierStore, StoreError,
};
use geopass_types::{BoundingBox, EventId, Nullifier};

use crate::write_batch::WriteBatch;
use crate::LmdbError;

#[derive(Clone)]
pub struct LmdbLedgerStore {
    pub(crate) env: Arc<Env>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) nullifiers_db: Database<Bytes, Bytes>,
}

impl LmdbLedgerStore {
    /// Begin a write batch. Dropping it without `commit` rolls back.
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, StoreError> {
        WriteBatch::new(self)
    }

    fn read_cell(&self, cell: LedgerCell) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        read_cell_in(&rtxn, &self.meta_db, cell)
    }

    fn require_cell(&self, cell: LedgerCell) -> Result<Vec<u8>, StoreError> {
        self.read_cell(cell)?.ok_or(StoreError::NotInitialized)
    }

    fn read_u32(&self, cell: LedgerCell) -> Result<u32, StoreError> {
        decode_u32(cell, &self.require_cell(cell)?)
    }
}

pub(crate) fn read_cell_in(
    txn: &RoTxn,
    db: &Database<Bytes, Bytes>,
    cell: LedgerCell,
) -> Result<Option<Vec<u8>>, StoreError> {
    Ok(db
        .get(txn, cell.key().as_bytes())
        .map_err(LmdbError::from)?
        .map(|v| v.to_vec()))
}

pub(crate) fn decode_u64(cell: LedgerCell, bytes: &[u8]) -> Result<u64, StoreError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization(format!("invalid {} length", cell.key())))?;
    Ok(u64::from_le_bytes(arr))
}

pub(crate) fn decode_u32(cell: LedgerCell, bytes: &[u8]) -> Result<u32, StoreError> {
    let arr: [u8; 4] = bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization(format!("invalid {} length", cell.key())))?;
    Ok(u32::from_le_bytes(arr))
}

impl CellStore for LmdbLedgerStore {
    fn is_initialized(&self) -> Result<bool, StoreError> {
        Ok(self.read_cell(LedgerCell::EventId)?.is_some())
    }

    fn get_round(&self) -> Result<u64, StoreError> {
        decode_u64(LedgerCell::Round, &self.require_cell(LedgerCell::Round)?)
    }

    fn get_event_id(&self) -> Result<EventId, StoreError> {
        let bytes = self.require_cell(LedgerCell::EventId)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| LmdbError::Serialization("invalid event_id length".into()))?;
        Ok(EventId::new(arr))
    }

    fn get_bounding_box(&self) -> Result<BoundingBox, StoreError> {
        Ok(BoundingBox::new(
            self.read_u32(LedgerCell::LatMin)?,
            self.read_u32(LedgerCell::LatMax)?,
            self.read_u32(LedgerCell::LonMin)?,
            self.read_u32(LedgerCell::LonMax)?,
        ))
    }
}

impl NullifierStore for LmdbLedgerStore {
    fn nullifier_exists(&self, nullifier: &Nullifier) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .nullifiers_db
            .get(&rtxn, nullifier.as_bytes())
            .map_err(LmdbError::from)?;
        Ok(found.is_some())
    }

    fn nullifier_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.nullifiers_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn iter_nullifiers(&self) -> Result<Vec<Nullifier>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        let iter = self.nullifiers_db.iter(&rtxn).map_err(LmdbError::from)?;
        for result in iter {
            let (key, _) = result.map_err(LmdbError::from)?;
            let n = Nullifier::from_slice(key)
                .map_err(|e| LmdbError::Serialization(e.to_string()))?;
            out.push(n);
        }
        Ok(out)
    }
}

impl LedgerStore for LmdbLedgerStore {
    fn apply(&self, program: &[LedgerOp]) -> Result<(), StoreError> {
        let mut batch = self.write_batch()?;
        for op in program {
            batch.run(op)?;
        }
        batch.commit()
    }
}
