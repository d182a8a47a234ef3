use proptest::prelude::*;

use geopass_types::{BoundingBox, CoordinateEncoding, EventId, Nullifier, ScaledPoint};

proptest! {
    /// Nullifier hex display parses back to the same value.
    #[test]
    fn nullifier_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let n = Nullifier::new(bytes);
        prop_assert_eq!(Nullifier::from_hex(&n.to_string()).unwrap(), n);
    }

    /// EventId hex display parses back to the same value.
    #[test]
    fn event_id_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = EventId::new(bytes);
        prop_assert_eq!(EventId::from_hex(&id.to_string()).unwrap(), id);
    }

    /// Nullifier bincode serialization roundtrip.
    #[test]
    fn nullifier_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let n = Nullifier::new(bytes);
        let encoded = bincode::serialize(&n).unwrap();
        let decoded: Nullifier = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, n);
    }

    /// `contains` agrees with the four inclusive comparisons.
    #[test]
    fn bbox_contains_matches_comparisons(
        a in any::<u32>(), b in any::<u32>(), c in any::<u32>(), d in any::<u32>(),
        lat in any::<u32>(), lon in any::<u32>(),
    ) {
        let bbox = BoundingBox::new(a, b, c, d);
        let expected = lat >= a && lat <= b && lon >= c && lon <= d;
        prop_assert_eq!(bbox.contains(lat, lon), expected);
    }

    /// Offset encoding never fails on the globe and decodes within half a microdegree.
    #[test]
    fn offset_encoding_covers_globe(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
        let enc = CoordinateEncoding::Offset;
        let p = enc.encode(lat, lon).unwrap();
        let (dlat, dlon) = enc.decode(p);
        prop_assert!((dlat - lat).abs() <= 0.5e-6 + 1e-9);
        prop_assert!((dlon - lon).abs() <= 0.5e-6 + 1e-9);
    }

    /// Offset encoding is monotonic in latitude.
    #[test]
    fn offset_encoding_monotonic(a in -90.0f64..=90.0, b in -90.0f64..=90.0) {
        let enc = CoordinateEncoding::Offset;
        let pa: ScaledPoint = enc.encode(a, 0.0).unwrap();
        let pb: ScaledPoint = enc.encode(b, 0.0).unwrap();
        if a <= b {
            prop_assert!(pa.lat <= pb.lat);
        } else {
            prop_assert!(pa.lat >= pb.lat);
        }
    }
}
