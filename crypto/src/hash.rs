//! Persistent hashing: Blake2b-256 and SHA-256 behind a swappable oracle.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use sha2::Sha256;

type Blake2b256 = Blake2b<U32>;

/// A persistent, collision-resistant hash over a domain tag and a list of fields.
///
/// Implementations must be deterministic and offer at least 256-bit collision
/// resistance; fields are absorbed in order with no length framing, so callers
/// are expected to pass fixed-width fields.
pub trait HashOracle {
    fn persistent_hash(&self, domain_tag: &[u8], fields: &[&[u8]]) -> [u8; 32];

    /// Human-readable name, for logs and snapshots.
    fn name(&self) -> &str;
}

/// SHA-256 oracle; the default for nullifier derivation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Oracle;

impl HashOracle for Sha256Oracle {
    fn persistent_hash(&self, domain_tag: &[u8], fields: &[&[u8]]) -> [u8; 32] {
        let mut parts = Vec::with_capacity(fields.len() + 1);
        parts.push(domain_tag);
        parts.extend_from_slice(fields);
        sha256_multi(&parts)
    }

    fn name(&self) -> &str {
        "sha256"
    }
}

/// Blake2b-256 oracle.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake2bOracle;

impl HashOracle for Blake2bOracle {
    fn persistent_hash(&self, domain_tag: &[u8], fields: &[&[u8]]) -> [u8; 32] {
        let mut parts = Vec::with_capacity(fields.len() + 1);
        parts.push(domain_tag);
        parts.extend_from_slice(fields);
        blake2b_256_multi(&parts)
    }

    fn name(&self) -> &str {
        "blake2b-256"
    }
}

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// SHA-256 over multiple byte slices in sequence.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
