//! Nullable witness — deterministic device secrets.

use geopass_ledger::{LedgerState, WitnessError, WitnessProvider};
use std::sync::Mutex;

enum Mode {
    Secrets(Vec<Vec<u8>>),
    Fail(String),
}

/// A deterministic witness provider for testing.
///
/// Returns pre-configured secrets in order, cycling when exhausted. The
/// private state is the number of secrets the ledger accepted.
pub struct NullWitness {
    mode: Mode,
    index: Mutex<usize>,
    calls: Mutex<u64>,
}

impl NullWitness {
    /// Create with a sequence of 32-byte secrets.
    pub fn new(secrets: Vec<[u8; 32]>) -> Self {
        Self::with_mode(Mode::Secrets(secrets.into_iter().map(|s| s.to_vec()).collect()))
    }

    /// Create with a single secret returned for every call.
    pub fn constant(secret: [u8; 32]) -> Self {
        Self::new(vec![secret])
    }

    /// Always return `bytes`, whatever its length.
    pub fn raw(bytes: Vec<u8>) -> Self {
        Self::with_mode(Mode::Secrets(vec![bytes]))
    }

    /// Always fail with [`WitnessError::Unavailable`].
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_mode(Mode::Fail(reason.into()))
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            index: Mutex::new(0),
            calls: Mutex::new(0),
        }
    }

    /// How many times the provider has been asked for a secret.
    pub fn calls(&self) -> u64 {
        *self.calls.lock().unwrap()
    }
}

impl WitnessProvider for NullWitness {
    type PrivateState = u64;

    fn device_secret(
        &self,
        _ledger: &LedgerState,
        accepted: &u64,
    ) -> Result<(u64, Vec<u8>), WitnessError> {
        *self.calls.lock().unwrap() += 1;
        match &self.mode {
            Mode::Fail(reason) => Err(WitnessError::Unavailable(reason.clone())),
            Mode::Secrets(secrets) if secrets.is_empty() => {
                Err(WitnessError::Unavailable("no secrets configured".into()))
            }
            Mode::Secrets(secrets) => {
                let mut idx = self.index.lock().unwrap();
                let current = *idx % secrets.len();
                *idx += 1;
                Ok((accepted + 1, secrets[current].clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopass_ledger::init;
    use geopass_types::EventId;

    fn ledger() -> LedgerState {
        init(EventId::ZERO, 0, 1, 0, 1)
    }

    #[test]
    fn cycles_through_secrets() {
        let w = NullWitness::new(vec![[1; 32], [2; 32]]);
        let l = ledger();
        let (_, a) = w.device_secret(&l, &0).unwrap();
        let (_, b) = w.device_secret(&l, &0).unwrap();
        let (_, c) = w.device_secret(&l, &0).unwrap();
        assert_eq!(a, vec![1; 32]);
        assert_eq!(b, vec![2; 32]);
        assert_eq!(c, vec![1; 32]);
        assert_eq!(w.calls(), 3);
    }

    #[test]
    fn failing_mode_errors() {
        let w = NullWitness::failing("offline");
        assert_eq!(
            w.device_secret(&ledger(), &0),
            Err(WitnessError::Unavailable("offline".into()))
        );
    }

    #[test]
    fn raw_mode_passes_length_through() {
        let w = NullWitness::raw(vec![0; 31]);
        let (next, bytes) = w.device_secret(&ledger(), &4).unwrap();
        assert_eq!(next, 5);
        assert_eq!(bytes.len(), 31);
    }
}
