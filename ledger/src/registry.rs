//! Set of nullifiers consumed by accepted claims.

use std::collections::HashSet;

use geopass_crypto::{derive_nullifier, HashOracle};
use geopass_types::{DeviceSecret, EventId, Nullifier};
use thiserror::Error;

/// Returned by [`NullifierRegistry::insert`] when the value is already recorded.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("nullifier {0} already present")]
pub struct AlreadyPresent(pub Nullifier);

/// Unordered set of used nullifiers. Iteration order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullifierRegistry {
    used: HashSet<Nullifier>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commitment for `(round, secret, event_id)` under the given oracle.
    pub fn derive<H: HashOracle + ?Sized>(
        oracle: &H,
        round: u64,
        secret: &DeviceSecret,
        event_id: &EventId,
    ) -> Nullifier {
        derive_nullifier(oracle, round, secret, event_id)
    }

    pub fn member(&self, nullifier: &Nullifier) -> bool {
        self.used.contains(nullifier)
    }

    pub fn insert(&mut self, nullifier: Nullifier) -> Result<(), AlreadyPresent> {
        if self.used.insert(nullifier) {
            Ok(())
        } else {
            Err(AlreadyPresent(nullifier))
        }
    }

    pub fn size(&self) -> u64 {
        self.used.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Nullifier> {
        self.used.iter()
    }

    /// Nullifiers in byte order, for canonical encodings.
    pub fn sorted(&self) -> Vec<Nullifier> {
        let mut out: Vec<Nullifier> = self.used.iter().copied().collect();
        out.sort_unstable();
        out
    }
}

impl FromIterator<Nullifier> for NullifierRegistry {
    fn from_iter<I: IntoIterator<Item = Nullifier>>(iter: I) -> Self {
        Self {
            used: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopass_crypto::Sha256Oracle;

    #[test]
    fn insert_then_member() {
        let mut reg = NullifierRegistry::new();
        let n = Nullifier::new([7; 32]);
        assert!(reg.is_empty());
        assert!(!reg.member(&n));
        reg.insert(n).unwrap();
        assert!(reg.member(&n));
        assert_eq!(reg.size(), 1);
        assert!(!reg.is_empty());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut reg = NullifierRegistry::new();
        let n = Nullifier::new([1; 32]);
        reg.insert(n).unwrap();
        assert_eq!(reg.insert(n), Err(AlreadyPresent(n)));
        assert_eq!(reg.size(), 1);
    }

    #[test]
    fn derive_is_deterministic_and_round_sensitive() {
        let secret = DeviceSecret::new([0x11; 32]);
        let event = EventId::new([0x22; 32]);
        let a = NullifierRegistry::derive(&Sha256Oracle, 0, &secret, &event);
        let b = NullifierRegistry::derive(&Sha256Oracle, 0, &secret, &event);
        let c = NullifierRegistry::derive(&Sha256Oracle, 1, &secret, &event);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn iteration_visits_every_entry() {
        let reg: NullifierRegistry = (0u8..5).map(|i| Nullifier::new([i; 32])).collect();
        assert_eq!(reg.iter().count(), 5);
        let sorted = reg.sorted();
        assert!(sorted.windows(2).all(|w| w[0] < w[1]));
    }
}
