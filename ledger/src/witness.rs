//! Witness providers: where the private per-claim device secret comes from.

use geopass_crypto::derive_device_secret;
use geopass_types::DeviceKey;
use thiserror::Error;

use crate::state::LedgerState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WitnessError {
    #[error("witness unavailable: {0}")]
    Unavailable(String),

    #[error("witness rejected the request: {0}")]
    Rejected(String),
}

/// Supplies the device secret for a claim.
///
/// Implementations receive a read-only view of the ledger and their own
/// opaque private state, and return the successor private state with the
/// secret bytes. The transition checks the length; anything other than 32
/// bytes fails the claim. The successor state is only kept by the caller if
/// the claim is accepted.
pub trait WitnessProvider {
    type PrivateState;

    fn device_secret(
        &self,
        ledger: &LedgerState,
        private_state: &Self::PrivateState,
    ) -> Result<(Self::PrivateState, Vec<u8>), WitnessError>;
}

/// Witness backed by a durable device key: the secret for an event is
/// `HMAC-SHA256(key, tag || event_id)`, so the same device yields the same
/// secret for every claim on one event.
pub struct DeviceKeyWitness {
    key: DeviceKey,
}

impl DeviceKeyWitness {
    pub fn new(key: DeviceKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &DeviceKey {
        &self.key
    }
}

impl WitnessProvider for DeviceKeyWitness {
    /// Number of secrets handed out for accepted claims.
    type PrivateState = u64;

    fn device_secret(
        &self,
        ledger: &LedgerState,
        issued: &u64,
    ) -> Result<(u64, Vec<u8>), WitnessError> {
        let secret = derive_device_secret(&self.key, ledger.event_id());
        Ok((issued.saturating_add(1), secret.as_bytes().to_vec()))
    }
}
