//! Addressable ledger cells.

use crate::StoreError;
use geopass_types::{BoundingBox, EventId};

/// The seven addressable cells of a GeoPass ledger, in slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgerCell {
    UsedNullifiers,
    Round,
    EventId,
    LatMin,
    LatMax,
    LonMin,
    LonMax,
}

impl LedgerCell {
    /// Every cell, in slot order.
    pub const ALL: [LedgerCell; 7] = [
        Self::UsedNullifiers,
        Self::Round,
        Self::EventId,
        Self::LatMin,
        Self::LatMax,
        Self::LonMin,
        Self::LonMax,
    ];

    /// Stable key used by key-value backends.
    pub fn key(&self) -> &'static str {
        match self {
            Self::UsedNullifiers => "used_nullifiers",
            Self::Round => "round",
            Self::EventId => "event_id",
            Self::LatMin => "lat_min",
            Self::LatMax => "lat_max",
            Self::LonMin => "lon_min",
            Self::LonMax => "lon_max",
        }
    }
}

/// Read access to the scalar cells (everything except the nullifier set).
pub trait CellStore {
    /// Whether genesis has been written.
    fn is_initialized(&self) -> Result<bool, StoreError>;

    fn get_round(&self) -> Result<u64, StoreError>;

    fn get_event_id(&self) -> Result<EventId, StoreError>;

    fn get_bounding_box(&self) -> Result<BoundingBox, StoreError>;
}
