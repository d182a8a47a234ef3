//! Nullifier derivation.
//!
//! `nullifier = H(TAG || be32(round) || device_secret || event_id)`
//!
//! Every field is exactly 32 bytes, so plain concatenation is unambiguous.

use geopass_types::{DeviceSecret, EventId, Nullifier};

use crate::hash::HashOracle;

/// Domain-separation tag for claim nullifiers: the ASCII string
/// `midnight:geopass:nullifier` right-padded with zero bytes to 32.
pub const NULLIFIER_DOMAIN_TAG: [u8; 32] = *b"midnight:geopass:nullifier\0\0\0\0\0\0";

/// Big-endian encoding of `round` in a 32-byte field.
pub fn encode_round(round: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&round.to_be_bytes());
    out
}

/// Derive the nullifier for a claim. Pure: no hidden state.
pub fn derive_nullifier<H: HashOracle + ?Sized>(
    oracle: &H,
    round: u64,
    secret: &DeviceSecret,
    event_id: &EventId,
) -> Nullifier {
    let round_field = encode_round(round);
    Nullifier::new(oracle.persistent_hash(
        &NULLIFIER_DOMAIN_TAG,
        &[&round_field, secret.as_bytes(), event_id.as_bytes()],
    ))
}
