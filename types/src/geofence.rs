//! The rectangular geofence stored in the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive bounds on scaled latitude and longitude.
///
/// Values are opaque `u32`s; the fixed-point scaling is a caller convention
/// (see [`crate::coords`]). No `min <= max` ordering is enforced here, an
/// inverted box simply admits nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: u32,
    pub lat_max: u32,
    pub lon_min: u32,
    pub lon_max: u32,
}

impl BoundingBox {
    pub fn new(lat_min: u32, lat_max: u32, lon_min: u32, lon_max: u32) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Whether both axes have `min <= max`.
    pub fn is_well_ordered(&self) -> bool {
        self.lat_min <= self.lat_max && self.lon_min <= self.lon_max
    }

    /// Whether a point lies inside the box, bounds inclusive.
    pub fn contains(&self, lat: u32, lon: u32) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat [{}, {}] lon [{}, {}]",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let bbox = BoundingBox::new(10, 20, 100, 200);
        assert!(bbox.contains(10, 100));
        assert!(bbox.contains(20, 200));
        assert!(!bbox.contains(9, 150));
        assert!(!bbox.contains(15, 201));
    }

    #[test]
    fn inverted_box_contains_nothing() {
        let bbox = BoundingBox::new(20, 10, 100, 200);
        assert!(!bbox.is_well_ordered());
        assert!(!bbox.contains(15, 150));
    }
}
