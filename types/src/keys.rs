//! Private key material: the durable device key and the per-claim device secret.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TypesError;

/// Required length of a device secret returned by a witness provider.
pub const DEVICE_SECRET_LEN: usize = 32;

/// A 32-byte private value supplied fresh for each claim.
///
/// Never written to the ledger. Deliberately not `Clone` or `Serialize`;
/// `Debug` is redacted and bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DeviceSecret([u8; DEVICE_SECRET_LEN]);

impl DeviceSecret {
    pub fn new(bytes: [u8; DEVICE_SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// Accept witness output only if it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let arr: [u8; DEVICE_SECRET_LEN] =
            bytes.try_into().map_err(|_| TypesError::InvalidLength {
                expected: DEVICE_SECRET_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; DEVICE_SECRET_LEN] {
        &self.0
    }
}

impl fmt::Debug for DeviceSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeviceSecret(<redacted>)")
    }
}

/// Durable key material held by a device, from which device secrets are derived.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DeviceKey(pub [u8; 32]);

impl DeviceKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a hex-encoded key (as stored in a device key file).
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let raw = s.trim();
        let raw = raw.strip_prefix("0x").unwrap_or(raw);
        let mut bytes = hex::decode(raw).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
        let result = <[u8; 32]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| TypesError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        bytes.zeroize();
        result
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeviceKey(<redacted>)")
    }
}
