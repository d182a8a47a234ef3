//! Ledger snapshots: the full state of an event ledger at one round.
//!
//! The hash is Blake2b-256 over a canonical encoding (nullifiers sorted), so
//! two snapshots of the same state hash identically regardless of how the
//! registry was iterated.

use geopass_crypto::blake2b_256_multi;
use geopass_types::{BoundingBox, EventId, Nullifier};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::registry::NullifierRegistry;
use crate::state::LedgerState;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the remaining fields.
    pub hash: [u8; 32],
    pub version: u32,
    pub event_id: EventId,
    pub bbox: BoundingBox,
    pub round: u64,
    /// Sorted ascending.
    pub nullifiers: Vec<Nullifier>,
}

impl LedgerSnapshot {
    pub fn create(state: &LedgerState) -> Self {
        let mut snap = Self {
            hash: [0u8; 32],
            version: SNAPSHOT_VERSION,
            event_id: *state.event_id(),
            bbox: *state.bounding_box(),
            round: state.round(),
            nullifiers: state.used_nullifiers().sorted(),
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        let version = self.version.to_le_bytes();
        let bbox = [
            self.bbox.lat_min.to_le_bytes(),
            self.bbox.lat_max.to_le_bytes(),
            self.bbox.lon_min.to_le_bytes(),
            self.bbox.lon_max.to_le_bytes(),
        ]
        .concat();
        let round = self.round.to_le_bytes();
        let count = (self.nullifiers.len() as u64).to_le_bytes();

        let mut parts: Vec<&[u8]> = Vec::with_capacity(5 + self.nullifiers.len());
        parts.push(&version);
        parts.push(self.event_id.as_bytes());
        parts.push(&bbox);
        parts.push(&round);
        parts.push(&count);
        parts.extend(self.nullifiers.iter().map(|n| n.as_bytes().as_slice()));
        blake2b_256_multi(&parts)
    }

    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::InvalidSnapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::InvalidSnapshot(e.to_string()))
    }

    pub fn nullifier_count(&self) -> usize {
        self.nullifiers.len()
    }
}

impl LedgerState {
    /// Rebuild a state from a snapshot after checking its hash and contents.
    pub fn from_snapshot(snap: &LedgerSnapshot) -> Result<Self, LedgerError> {
        if snap.version != SNAPSHOT_VERSION {
            return Err(LedgerError::InvalidSnapshot(format!(
                "unsupported version {}",
                snap.version
            )));
        }
        if !snap.verify() {
            return Err(LedgerError::SnapshotMismatch);
        }
        let mut registry = NullifierRegistry::new();
        for n in &snap.nullifiers {
            registry
                .insert(*n)
                .map_err(|e| LedgerError::InvalidSnapshot(e.to_string()))?;
        }
        if registry.size() != snap.round {
            return Err(LedgerError::InvalidSnapshot(format!(
                "round {} but {} nullifiers",
                snap.round,
                registry.size()
            )));
        }
        Ok(LedgerState::from_parts(snap.event_id, snap.bbox, snap.round, registry))
    }
}
