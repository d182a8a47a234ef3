//! Cryptographic primitives for GeoPass.
//!
//! - **Persistent hash oracles**: SHA-256 (default) and Blake2b-256 behind [`HashOracle`]
//! - **Nullifier derivation** under a fixed 32-byte domain-separation tag
//! - **Device secrets** derived with HMAC-SHA256 from durable device key material

pub mod device;
pub mod hash;
pub mod nullifier;

pub use device::{derive_device_secret, generate_device_key};
pub use hash::{blake2b_256, blake2b_256_multi, sha256_multi, Blake2bOracle, HashOracle, Sha256Oracle};
pub use nullifier::{derive_nullifier, encode_round, NULLIFIER_DOMAIN_TAG};
