//! Caller-side coordinate encoding.
//!
//! The ledger treats coordinates as opaque `u32`s. This module is the convention
//! clients use to get there: degrees are scaled to microdegrees (`× 1_000_000`)
//! and, with [`CoordinateEncoding::Offset`], shifted by +90° / +180° so that the
//! southern and western hemispheres stay non-negative.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Microdegrees per degree.
pub const E6: f64 = 1_000_000.0;
/// +90° in microdegrees.
pub const LAT_OFFSET_E6: i64 = 90_000_000;
/// +180° in microdegrees.
pub const LON_OFFSET_E6: i64 = 180_000_000;

/// How degrees map onto the ledger's `u32` coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateEncoding {
    /// `round(deg × 10^6)`; negative coordinates are rejected.
    #[default]
    Plain,
    /// `round(deg × 10^6) + offset`; covers the whole globe.
    Offset,
}

/// A latitude/longitude pair already in the ledger's scaled space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledPoint {
    pub lat: u32,
    pub lon: u32,
}

impl CoordinateEncoding {
    /// Encode a latitude/longitude pair given in degrees.
    pub fn encode(&self, lat_deg: f64, lon_deg: f64) -> Result<ScaledPoint, TypesError> {
        check_range("latitude", lat_deg, 90.0)?;
        check_range("longitude", lon_deg, 180.0)?;
        Ok(ScaledPoint {
            lat: self.encode_axis(lat_deg, LAT_OFFSET_E6)?,
            lon: self.encode_axis(lon_deg, LON_OFFSET_E6)?,
        })
    }

    /// Encode a single latitude value (used for bounding-box edges).
    pub fn encode_lat(&self, lat_deg: f64) -> Result<u32, TypesError> {
        check_range("latitude", lat_deg, 90.0)?;
        self.encode_axis(lat_deg, LAT_OFFSET_E6)
    }

    /// Encode a single longitude value (used for bounding-box edges).
    pub fn encode_lon(&self, lon_deg: f64) -> Result<u32, TypesError> {
        check_range("longitude", lon_deg, 180.0)?;
        self.encode_axis(lon_deg, LON_OFFSET_E6)
    }

    /// Inverse of [`encode`](Self::encode), for display only.
    pub fn decode(&self, point: ScaledPoint) -> (f64, f64) {
        let (lat_off, lon_off) = match self {
            Self::Plain => (0, 0),
            Self::Offset => (LAT_OFFSET_E6, LON_OFFSET_E6),
        };
        (
            (point.lat as i64 - lat_off) as f64 / E6,
            (point.lon as i64 - lon_off) as f64 / E6,
        )
    }

    fn encode_axis(&self, deg: f64, offset: i64) -> Result<u32, TypesError> {
        let micro = (deg * E6).round() as i64;
        let shifted = match self {
            Self::Plain => {
                if micro < 0 {
                    return Err(TypesError::NegativeCoordinate { value: deg });
                }
                micro
            }
            Self::Offset => micro + offset,
        };
        // Range was checked above, so this always fits.
        Ok(shifted as u32)
    }
}

fn check_range(axis: &'static str, value: f64, limit: f64) -> Result<(), TypesError> {
    if !value.is_finite() || value < -limit || value > limit {
        return Err(TypesError::CoordinateOutOfRange { axis, value });
    }
    Ok(())
}
