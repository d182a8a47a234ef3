//! Genesis: the initial ledger state of an event.
//!
//! Genesis performs no cross-field validation. A bounding box with
//! `min > max` on either axis is accepted here and makes every later claim
//! fail its boundary check; callers that want to refuse such boxes can ask
//! [`GenesisConfig::ordering_issues`].

use geopass_store::LedgerOp;
use geopass_types::{BoundingBox, EventId};
use serde::{Deserialize, Serialize};

use crate::registry::NullifierRegistry;
use crate::state::LedgerState;

/// Externally invocable operations registered at genesis.
pub const ENTRYPOINTS: [&str; 1] = ["claim"];

/// Parameters fixed for the lifetime of an event ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    pub event_id: EventId,
    pub bbox: BoundingBox,
}

impl GenesisConfig {
    pub fn new(event_id: EventId, bbox: BoundingBox) -> Self {
        Self { event_id, bbox }
    }

    /// Human-readable descriptions of inverted bounds, empty when well ordered.
    pub fn ordering_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.bbox.lat_min > self.bbox.lat_max {
            issues.push(format!(
                "lat_min {} is greater than lat_max {}",
                self.bbox.lat_min, self.bbox.lat_max
            ));
        }
        if self.bbox.lon_min > self.bbox.lon_max {
            issues.push(format!(
                "lon_min {} is greater than lon_max {}",
                self.bbox.lon_min, self.bbox.lon_max
            ));
        }
        issues
    }

    /// Fresh in-memory state: round 0, no nullifiers.
    pub fn create_state(&self) -> LedgerState {
        LedgerState::from_parts(self.event_id, self.bbox, 0, NullifierRegistry::new())
    }
}

/// Allocate a ledger at round 0 with an empty registry.
pub fn init(event_id: EventId, lat_min: u32, lat_max: u32, lon_min: u32, lon_max: u32) -> LedgerState {
    GenesisConfig::new(event_id, BoundingBox::new(lat_min, lat_max, lon_min, lon_max)).create_state()
}

/// Store program writing genesis. Fails if the store was already initialised.
pub fn genesis_program(config: &GenesisConfig) -> Vec<LedgerOp> {
    vec![
        LedgerOp::ExpectUninitialized,
        LedgerOp::SetEventId(config.event_id),
        LedgerOp::SetBoundingBox(config.bbox),
        LedgerOp::SetRound(0),
    ]
}
