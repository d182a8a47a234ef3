#![no_main]

use std::cell::Cell;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use geopass_ledger::{init, ClaimError, ClaimTransition, LedgerState, WitnessError, WitnessProvider};
use geopass_types::EventId;

#[derive(Arbitrary, Debug)]
struct Input {
    event: [u8; 32],
    bbox: [u32; 4],
    claims: Vec<(u32, u32, [u8; 32])>,
}

struct CellWitness(Cell<[u8; 32]>);

impl WitnessProvider for CellWitness {
    type PrivateState = ();

    fn device_secret(&self, _: &LedgerState, _: &()) -> Result<((), Vec<u8>), WitnessError> {
        Ok(((), self.0.get().to_vec()))
    }
}

// Arbitrary geofences, coordinates and secrets never panic, and every
// accepted claim adds exactly one nullifier and one round.
fuzz_target!(|input: Input| {
    let [lat_min, lat_max, lon_min, lon_max] = input.bbox;
    let mut state = init(EventId::new(input.event), lat_min, lat_max, lon_min, lon_max);
    let transition = ClaimTransition::new(CellWitness(Cell::new([0; 32])));

    for (lat, lon, secret) in input.claims {
        transition.witness().0.set(secret);
        let before = state.clone();
        match transition.claim(&mut state, &mut (), lat, lon) {
            Ok(()) => {
                assert_eq!(state.round(), before.round() + 1);
                assert_eq!(state.used_nullifiers().size(), before.used_nullifiers().size() + 1);
            }
            Err(ClaimError::Boundary(_)) | Err(ClaimError::AlreadyClaimed) => {
                assert_eq!(state, before);
            }
            Err(e) => panic!("unexpected rejection: {e}"),
        }
        assert_eq!(state.round(), state.used_nullifiers().size());
    }
});
