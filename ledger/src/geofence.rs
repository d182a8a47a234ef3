//! Bounding-box policy.

use geopass_types::BoundingBox;

use crate::error::BoundaryViolation;

/// Check a scaled coordinate pair against the geofence, bounds inclusive.
///
/// The order of checks is part of the observable contract: a point that is
/// both too far south and too far east reports `LatitudeBelowMin`.
pub fn validate(lat: u32, lon: u32, bbox: &BoundingBox) -> Result<(), BoundaryViolation> {
    if lat < bbox.lat_min {
        return Err(BoundaryViolation::LatitudeBelowMin);
    }
    if lat > bbox.lat_max {
        return Err(BoundaryViolation::LatitudeAboveMax);
    }
    if lon < bbox.lon_min {
        return Err(BoundaryViolation::LongitudeBelowMin);
    }
    if lon > bbox.lon_max {
        return Err(BoundaryViolation::LongitudeAboveMax);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hcmc() -> BoundingBox {
        BoundingBox::new(10_700_000, 10_950_000, 106_500_000, 106_900_000)
    }

    #[test]
    fn inside_passes() {
        assert_eq!(validate(10_800_000, 106_600_000, &hcmc()), Ok(()));
    }

    #[test]
    fn edges_are_inclusive() {
        let b = hcmc();
        assert!(validate(b.lat_min, b.lon_min, &b).is_ok());
        assert!(validate(b.lat_max, b.lon_max, &b).is_ok());
    }

    #[test]
    fn each_edge_reports_its_reason() {
        let b = hcmc();
        assert_eq!(
            validate(b.lat_min - 1, 106_600_000, &b),
            Err(BoundaryViolation::LatitudeBelowMin)
        );
        assert_eq!(
            validate(b.lat_max + 1, 106_600_000, &b),
            Err(BoundaryViolation::LatitudeAboveMax)
        );
        assert_eq!(
            validate(10_800_000, b.lon_min - 1, &b),
            Err(BoundaryViolation::LongitudeBelowMin)
        );
        assert_eq!(
            validate(10_800_000, b.lon_max + 1, &b),
            Err(BoundaryViolation::LongitudeAboveMax)
        );
    }

    #[test]
    fn latitude_is_checked_before_longitude() {
        let b = hcmc();
        assert_eq!(validate(0, u32::MAX, &b), Err(BoundaryViolation::LatitudeBelowMin));
        assert_eq!(validate(u32::MAX, 0, &b), Err(BoundaryViolation::LatitudeAboveMax));
    }

    #[test]
    fn inverted_box_rejects_everything() {
        let b = BoundingBox::new(20, 10, 0, u32::MAX);
        // Every latitude is either below 20 or above 10; the lower edge is checked first.
        assert_eq!(validate(15, 5, &b), Err(BoundaryViolation::LatitudeBelowMin));
        assert_eq!(validate(5, 5, &b), Err(BoundaryViolation::LatitudeBelowMin));
        assert_eq!(validate(25, 5, &b), Err(BoundaryViolation::LatitudeAboveMax));
    }
}
