//! Event identifiers.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypesError;

/// Domain tag for deriving an [`EventId`] from a human-readable label.
const EVENT_LABEL_TAG: &[u8] = b"geopass:event-id";

/// A 32-byte opaque event identifier, fixed at genesis.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventId([u8; 32]);

impl EventId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 64-character hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypesError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Derive an identifier from a label such as `"hcmc-demo"`.
    ///
    /// Deployments that only know their event by name get a stable 32-byte id
    /// without having to agree on a hex constant out of band.
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(EVENT_LABEL_TAG);
        hasher.update(label.as_bytes());
        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        Self(out)
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({}\u{2026})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
