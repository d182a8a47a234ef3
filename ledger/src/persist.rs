//! Mirroring ledger state into a transactional store.
//!
//! Every mutation is a [`geopass_store::LedgerOp`] program applied in one
//! store transaction; the in-memory state is only updated after the store
//! commits.

use geopass_crypto::HashOracle;
use geopass_store::{LedgerStore, StoreError};
use tracing::{debug, info};

use crate::claim::ClaimTransition;
use crate::error::{ClaimError, LedgerError};
use crate::genesis::{genesis_program, GenesisConfig};
use crate::registry::NullifierRegistry;
use crate::state::LedgerState;
use crate::witness::WitnessProvider;

/// Read the full ledger state out of a store.
///
/// The store must be initialised, and the nullifier count must equal the
/// round, otherwise the stored data is reported as corrupt.
pub fn load_ledger<S: LedgerStore + ?Sized>(store: &S) -> Result<LedgerState, LedgerError> {
    if !store.is_initialized()? {
        return Err(StoreError::NotInitialized.into());
    }
    let event_id = store.get_event_id()?;
    let bbox = store.get_bounding_box()?;
    let round = store.get_round()?;

    let mut registry = NullifierRegistry::new();
    for n in store.iter_nullifiers()? {
        registry
            .insert(n)
            .map_err(|e| StoreError::Corruption(e.to_string()))?;
    }
    if registry.size() != round {
        return Err(StoreError::Corruption(format!(
            "round is {round} but {} nullifiers are stored",
            registry.size()
        ))
        .into());
    }
    debug!(round, "ledger loaded");
    Ok(LedgerState::from_parts(event_id, bbox, round, registry))
}

/// Write genesis into an empty store and return the fresh state.
pub fn init_persistent<S: LedgerStore + ?Sized>(
    store: &S,
    config: &GenesisConfig,
) -> Result<LedgerState, LedgerError> {
    store.apply(&genesis_program(config))?;
    info!(event_id = %config.event_id, bbox = %config.bbox, "ledger initialised");
    Ok(config.create_state())
}

/// Evaluate a claim against `state`, commit it to `store`, then to `state`.
///
/// A duplicate reported by the store surfaces as [`ClaimError::AlreadyClaimed`];
/// any other store failure leaves both `state` and `private_state` untouched.
pub fn claim_persistent<S, W, H>(
    store: &S,
    state: &mut LedgerState,
    transition: &ClaimTransition<W, H>,
    private_state: &mut W::PrivateState,
    lat_e6: u32,
    lon_e6: u32,
) -> Result<(), LedgerError>
where
    S: LedgerStore + ?Sized,
    W: WitnessProvider,
    H: HashOracle,
{
    let prepared = match transition.prepare(state, private_state, lat_e6, lon_e6) {
        Ok(p) => p,
        Err(e) => {
            debug!(round = state.round(), reason = %e, "claim rejected");
            return Err(e.into());
        }
    };

    match store.apply(&prepared.effect.program()) {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => return Err(ClaimError::AlreadyClaimed.into()),
        Err(e) => return Err(e.into()),
    }

    if let Err(e) = state.apply_effect(&prepared.effect) {
        return Err(StoreError::Corruption(format!(
            "store accepted a claim the in-memory ledger refused: {e}"
        ))
        .into());
    }
    *private_state = prepared.private_state;

    info!(
        round = prepared.effect.round,
        nullifier = %prepared.effect.nullifier.short(),
        "claim committed"
    );
    Ok(())
}
