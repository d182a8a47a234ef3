#![no_main]

use libfuzzer_sys::fuzz_target;

use geopass_ledger::{LedgerSnapshot, LedgerState};

// Snapshot decoding and restoring never panic on malformed input, and a
// restored state always satisfies round == nullifier count.
fuzz_target!(|data: &[u8]| {
    if let Ok(snap) = LedgerSnapshot::from_bytes(data) {
        if let Ok(state) = LedgerState::from_snapshot(&snap) {
            assert_eq!(state.round(), state.used_nullifiers().size());
        }
    }
    if let Ok(snap) = serde_json::from_slice::<LedgerSnapshot>(data) {
        let _ = LedgerState::from_snapshot(&snap);
    }
});
