use proptest::prelude::*;

use geopass_ledger::{init, validate, ClaimError, ClaimTransition};
use geopass_nullables::NullWitness;
use geopass_types::{BoundingBox, EventId};

fn coords() -> impl Strategy<Value = (u32, u32)> {
    (10_600_000u32..11_050_000, 106_400_000u32..107_000_000)
}

proptest! {
    /// After any mix of claims, round equals the number of recorded nullifiers
    /// and rejected claims leave the state exactly as it was.
    #[test]
    fn round_tracks_registry_size(
        claims in prop::collection::vec((coords(), prop::array::uniform32(0u8..4)), 0..40)
    ) {
        let mut state = init(EventId::new([1; 32]), 10_700_000, 10_950_000, 106_500_000, 106_900_000);
        let mut ps = 0u64;
        let mut accepted = 0u64;

        for ((lat, lon), secret) in claims {
            let t = ClaimTransition::new(NullWitness::constant(secret));
            let before = state.clone();
            match t.claim(&mut state, &mut ps, lat, lon) {
                Ok(()) => {
                    accepted += 1;
                    prop_assert_eq!(state.round(), before.round() + 1);
                }
                Err(ClaimError::Boundary(reason)) => {
                    prop_assert_eq!(validate(lat, lon, before.bounding_box()), Err(reason));
                    prop_assert_eq!(&state, &before);
                }
                Err(e) => {
                    prop_assert!(false, "unexpected rejection {}", e);
                }
            }
            prop_assert_eq!(state.round(), state.used_nullifiers().size());
        }
        prop_assert_eq!(state.round(), accepted);
        prop_assert_eq!(ps, accepted);
        prop_assert_eq!(state.used_nullifiers().is_empty(), accepted == 0);
    }

    /// A claim is accepted iff the point is inside the box (fresh ledger).
    #[test]
    fn acceptance_matches_containment(
        b in prop::array::uniform4(0u32..1_000),
        lat in 0u32..1_000,
        lon in 0u32..1_000,
    ) {
        let bbox = BoundingBox::new(b[0], b[1], b[2], b[3]);
        let mut state = init(EventId::ZERO, b[0], b[1], b[2], b[3]);
        let t = ClaimTransition::new(NullWitness::constant([9; 32]));
        let ok = t.claim(&mut state, &mut 0, lat, lon).is_ok();
        prop_assert_eq!(ok, bbox.contains(lat, lon));
    }
}
