//! Ledger cell programs: the unit of atomic mutation.

use crate::cell::CellStore;
use crate::nullifier::NullifierStore;
use crate::StoreError;
use geopass_types::{BoundingBox, EventId, Nullifier};

/// One step of an ordered program against the ledger cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerOp {
    /// Abort with [`StoreError::AlreadyInitialized`] if genesis was written.
    ExpectUninitialized,
    /// Abort with [`StoreError::Conflict`] unless the stored round equals this.
    ExpectRound(u64),
    SetEventId(EventId),
    SetBoundingBox(BoundingBox),
    SetRound(u64),
    /// Abort with [`StoreError::Duplicate`] if the nullifier is already present.
    InsertNullifier(Nullifier),
}

/// A transactional ledger backend.
///
/// `apply` executes the program in order inside one transaction. If any step
/// fails, nothing from the program is visible afterwards.
pub trait LedgerStore: CellStore + NullifierStore {
    fn apply(&self, program: &[LedgerOp]) -> Result<(), StoreError>;
}
