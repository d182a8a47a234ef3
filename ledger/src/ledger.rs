//! A ledger bound to its store.

use geopass_crypto::HashOracle;
use geopass_store::{LedgerStore, StoreError};
use geopass_types::{BoundingBox, EventId};
use serde::Serialize;

use crate::claim::ClaimTransition;
use crate::error::LedgerError;
use crate::genesis::GenesisConfig;
use crate::persist::{claim_persistent, init_persistent, load_ledger};
use crate::snapshot::LedgerSnapshot;
use crate::state::LedgerState;
use crate::witness::WitnessProvider;

/// Owned handle pairing a store with the state last committed to it.
pub struct PersistentLedger<S: LedgerStore> {
    store: S,
    state: LedgerState,
}

impl<S: LedgerStore> PersistentLedger<S> {
    /// Write genesis into an empty store.
    pub fn init(store: S, config: &GenesisConfig) -> Result<Self, LedgerError> {
        let state = init_persistent(&store, config)?;
        Ok(Self { store, state })
    }

    /// Open an already initialised store.
    pub fn open(store: S) -> Result<Self, LedgerError> {
        let state = load_ledger(&store)?;
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn claim<W: WitnessProvider, H: HashOracle>(
        &mut self,
        transition: &ClaimTransition<W, H>,
        private_state: &mut W::PrivateState,
        lat_e6: u32,
        lon_e6: u32,
    ) -> Result<(), LedgerError> {
        claim_persistent(
            &self.store,
            &mut self.state,
            transition,
            private_state,
            lat_e6,
            lon_e6,
        )
    }

    /// Re-read the state from the store, discarding the cached copy.
    pub fn reload(&mut self) -> Result<(), LedgerError> {
        self.state = load_ledger(&self.store)?;
        Ok(())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::create(&self.state)
    }

    /// Counts as recorded by the store, cross-checked against the cache.
    pub fn summary(&self) -> Result<LedgerSummary, LedgerError> {
        let summary = LedgerSummary {
            event_id: self.store.get_event_id()?,
            bbox: self.store.get_bounding_box()?,
            round: self.store.get_round()?,
            nullifiers: self.store.nullifier_count()?,
        };
        if summary.round != self.state.round() {
            return Err(StoreError::Conflict {
                expected: self.state.round(),
                actual: summary.round,
            }
            .into());
        }
        Ok(summary)
    }
}

/// Summary of an event ledger for status output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub event_id: EventId,
    pub bbox: BoundingBox,
    pub round: u64,
    pub nullifiers: u64,
}
