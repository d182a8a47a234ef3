use geopass_store::StoreError;
use thiserror::Error;

/// Which geofence edge a rejected coordinate crossed.
///
/// Checks run latitude-min, latitude-max, longitude-min, longitude-max, and the
/// first failing one is reported.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum BoundaryViolation {
    #[error("latitude below minimum boundary")]
    LatitudeBelowMin,

    #[error("latitude above maximum boundary")]
    LatitudeAboveMax,

    #[error("longitude below minimum boundary")]
    LongitudeBelowMin,

    #[error("longitude above maximum boundary")]
    LongitudeAboveMax,
}

/// Reasons a claim is rejected. None of them change ledger state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("boundary violation: {0}")]
    Boundary(#[from] BoundaryViolation),

    #[error("already claimed for this event in this round")]
    AlreadyClaimed,

    #[error("witness failure: {0}")]
    WitnessFailure(String),

    #[error("round counter exhausted")]
    RoundExhausted,

    #[error("claim was prepared at round {prepared} but the ledger is at round {current}")]
    StaleRound { prepared: u64, current: u64 },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("snapshot hash does not match its contents")]
    SnapshotMismatch,

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl LedgerError {
    /// The claim rejection, if this error is one.
    pub fn as_claim(&self) -> Option<&ClaimError> {
        match self {
            Self::Claim(e) => Some(e),
            _ => None,
        }
    }
}
