//! The ledger state owned by one event contract.

use geopass_types::{BoundingBox, EventId};

use crate::claim::ClaimEffect;
use crate::error::ClaimError;
use crate::registry::NullifierRegistry;

/// Event id, geofence, round counter and used-nullifier set.
///
/// Fields are private: the only mutation path after genesis is an accepted
/// claim, applied through [`crate::ClaimTransition::claim`] or
/// [`crate::PersistentLedger::claim`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerState {
    event_id: EventId,
    bbox: BoundingBox,
    round: u64,
    used_nullifiers: NullifierRegistry,
}

impl LedgerState {
    pub(crate) fn from_parts(
        event_id: EventId,
        bbox: BoundingBox,
        round: u64,
        used_nullifiers: NullifierRegistry,
    ) -> Self {
        Self {
            event_id,
            bbox,
            round,
            used_nullifiers,
        }
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn lat_min(&self) -> u32 {
        self.bbox.lat_min
    }

    pub fn lat_max(&self) -> u32 {
        self.bbox.lat_max
    }

    pub fn lon_min(&self) -> u32 {
        self.bbox.lon_min
    }

    pub fn lon_max(&self) -> u32 {
        self.bbox.lon_max
    }

    pub fn used_nullifiers(&self) -> &NullifierRegistry {
        &self.used_nullifiers
    }

    /// Insert the nullifier and advance the round, together or not at all.
    ///
    /// The effect must come from `prepare` against this same state; a stale
    /// effect (wrong round or already-used nullifier) is refused untouched.
    pub(crate) fn apply_effect(&mut self, effect: &ClaimEffect) -> Result<(), ClaimError> {
        if effect.round != self.round {
            return Err(ClaimError::StaleRound {
                prepared: effect.round,
                current: self.round,
            });
        }
        let next = effect.next_round().ok_or(ClaimError::RoundExhausted)?;
        self.used_nullifiers
            .insert(effect.nullifier)
            .map_err(|_| ClaimError::AlreadyClaimed)?;
        self.round = next;
        Ok(())
    }
}
