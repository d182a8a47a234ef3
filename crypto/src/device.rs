//! Device key generation and per-event device secret derivation.
//!
//! The device key is durable material kept on the participant's device. The
//! secret handed to the claim transition is `HMAC-SHA256(key, TAG || event_id)`,
//! so the raw key never leaves the witness and each event sees an unrelated
//! secret.

use geopass_types::{DeviceKey, DeviceSecret, EventId};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

const DEVICE_SECRET_TAG: &[u8] = b"geopass:device-secret";

/// Generate a new device key from the OS random source.
pub fn generate_device_key() -> DeviceKey {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let key = DeviceKey(bytes);
    bytes.zeroize();
    key
}

/// Derive the device secret used for claims on `event_id`.
pub fn derive_device_secret(key: &DeviceKey, event_id: &EventId) -> DeviceSecret {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(DEVICE_SECRET_TAG);
    mac.update(event_id.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    let secret = DeviceSecret::new(out);
    out.zeroize();
    secret
}
