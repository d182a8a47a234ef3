//! The claim state transition.
//!
//! Order of evaluation is fixed and observable:
//!
//! 1. geofence check against the ledger's bounding box
//! 2. witness call for the device secret
//! 3. read round and event id
//! 4. derive the nullifier
//! 5. reject if the nullifier is already used
//! 6. insert the nullifier
//! 7. advance the round by one
//!
//! Steps 1-5 are computed by [`ClaimTransition::prepare`] without touching the
//! ledger. Steps 6-7 are the [`ClaimEffect`], applied as one unit either to the
//! in-memory state or, as a [`LedgerOp`] program, to a transactional store.

use geopass_crypto::{HashOracle, Sha256Oracle};
use geopass_store::LedgerOp;
use geopass_types::{DeviceSecret, Nullifier};
use tracing::{debug, info};
use zeroize::Zeroize;

use crate::error::ClaimError;
use crate::geofence;
use crate::registry::NullifierRegistry;
use crate::state::LedgerState;
use crate::witness::WitnessProvider;

/// The mutation an accepted claim performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimEffect {
    pub nullifier: Nullifier,
    /// Round the claim was evaluated at.
    pub round: u64,
}

impl ClaimEffect {
    /// Round after the effect is applied, `None` if the counter would wrap.
    pub fn next_round(&self) -> Option<u64> {
        self.round.checked_add(1)
    }

    /// Store program for this effect: guard the round, insert, advance.
    ///
    /// The insert step fails the whole program with `Duplicate` if the
    /// nullifier is already stored.
    pub fn program(&self) -> Vec<LedgerOp> {
        let mut ops = vec![
            LedgerOp::ExpectRound(self.round),
            LedgerOp::InsertNullifier(self.nullifier),
        ];
        if let Some(next) = self.next_round() {
            ops.push(LedgerOp::SetRound(next));
        }
        ops
    }
}

/// A claim that passed every check, with the witness's successor state.
#[derive(Debug)]
pub struct PreparedClaim<P> {
    pub effect: ClaimEffect,
    pub private_state: P,
}

/// Claim transition parameterised over the witness and the hash oracle.
pub struct ClaimTransition<W, H = Sha256Oracle> {
    witness: W,
    oracle: H,
}

impl<W: WitnessProvider> ClaimTransition<W, Sha256Oracle> {
    pub fn new(witness: W) -> Self {
        Self {
            witness,
            oracle: Sha256Oracle,
        }
    }
}

impl<W: WitnessProvider, H: HashOracle> ClaimTransition<W, H> {
    pub fn with_oracle(witness: W, oracle: H) -> Self {
        Self { witness, oracle }
    }

    pub fn witness(&self) -> &W {
        &self.witness
    }

    pub fn oracle(&self) -> &H {
        &self.oracle
    }

    /// Run the checks of a claim without mutating anything.
    pub fn prepare(
        &self,
        ledger: &LedgerState,
        private_state: &W::PrivateState,
        lat_e6: u32,
        lon_e6: u32,
    ) -> Result<PreparedClaim<W::PrivateState>, ClaimError> {
        geofence::validate(lat_e6, lon_e6, ledger.bounding_box())?;

        let (next_private, mut raw) = self
            .witness
            .device_secret(ledger, private_state)
            .map_err(|e| ClaimError::WitnessFailure(e.to_string()))?;
        let secret = DeviceSecret::from_slice(&raw);
        raw.zeroize();
        let secret = secret.map_err(|e| ClaimError::WitnessFailure(e.to_string()))?;

        let round = ledger.round();
        let nullifier = NullifierRegistry::derive(&self.oracle, round, &secret, ledger.event_id());

        if ledger.used_nullifiers().member(&nullifier) {
            return Err(ClaimError::AlreadyClaimed);
        }
        if round == u64::MAX {
            return Err(ClaimError::RoundExhausted);
        }

        Ok(PreparedClaim {
            effect: ClaimEffect { nullifier, round },
            private_state: next_private,
        })
    }

    /// Evaluate and, if accepted, apply a claim to `ledger`.
    ///
    /// On rejection neither `ledger` nor `private_state` changes.
    pub fn claim(
        &self,
        ledger: &mut LedgerState,
        private_state: &mut W::PrivateState,
        lat_e6: u32,
        lon_e6: u32,
    ) -> Result<(), ClaimError> {
        let prepared = match self.prepare(ledger, private_state, lat_e6, lon_e6) {
            Ok(p) => p,
            Err(e) => {
                debug!(round = ledger.round(), reason = %e, "claim rejected");
                return Err(e);
            }
        };

        if let Err(e) = ledger.apply_effect(&prepared.effect) {
            debug!(round = ledger.round(), reason = %e, "claim effect refused");
            return Err(e);
        }
        *private_state = prepared.private_state;

        info!(
            round = prepared.effect.round,
            nullifier = %prepared.effect.nullifier.short(),
            "claim accepted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoundaryViolation;
    use crate::genesis::init;
    use crate::witness::WitnessError;
    use geopass_crypto::{derive_nullifier, Blake2bOracle};
    use geopass_types::EventId;
    use std::cell::Cell;

    /// Returns a fixed byte string and counts calls.
    struct FixedWitness {
        bytes: Vec<u8>,
        calls: Cell<u32>,
    }

    impl FixedWitness {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                bytes,
                calls: Cell::new(0),
            }
        }
    }

    impl WitnessProvider for FixedWitness {
        type PrivateState = u32;

        fn device_secret(
            &self,
            _ledger: &LedgerState,
            state: &u32,
        ) -> Result<(u32, Vec<u8>), WitnessError> {
            self.calls.set(self.calls.get() + 1);
            Ok((state + 1, self.bytes.clone()))
        }
    }

    struct BrokenWitness;

    impl WitnessProvider for BrokenWitness {
        type PrivateState = ();

        fn device_secret(&self, _: &LedgerState, _: &()) -> Result<((), Vec<u8>), WitnessError> {
            Err(WitnessError::Unavailable("secure element locked".into()))
        }
    }

    fn ledger() -> LedgerState {
        let mut id = [0u8; 32];
        id[31] = 1;
        init(EventId::new(id), 10_700_000, 10_950_000, 106_500_000, 106_900_000)
    }

    #[test]
    fn accepted_claim_inserts_and_advances() {
        let mut state = ledger();
        let mut ps = 0;
        let t = ClaimTransition::new(FixedWitness::new(vec![0xAB; 32]));

        t.claim(&mut state, &mut ps, 10_800_000, 106_600_000).unwrap();

        assert_eq!(state.round(), 1);
        assert_eq!(state.used_nullifiers().size(), 1);
        assert_eq!(ps, 1);
        let expected = derive_nullifier(
            &Sha256Oracle,
            0,
            &DeviceSecret::new([0xAB; 32]),
            state.event_id(),
        );
        assert!(state.used_nullifiers().member(&expected));
    }

    #[test]
    fn boundary_failure_skips_the_witness() {
        let state = ledger();
        let t = ClaimTransition::new(FixedWitness::new(vec![0; 32]));
        let err = t.prepare(&state, &0, 10_000_000, 106_600_000).unwrap_err();
        assert_eq!(err, ClaimError::Boundary(BoundaryViolation::LatitudeBelowMin));
        assert_eq!(t.witness().calls.get(), 0);
    }

    #[test]
    fn short_secret_is_witness_failure() {
        let mut state = ledger();
        let before = state.clone();
        let mut ps = 5;
        let t = ClaimTransition::new(FixedWitness::new(vec![1; 31]));
        let err = t.claim(&mut state, &mut ps, 10_800_000, 106_600_000).unwrap_err();
        assert!(matches!(err, ClaimError::WitnessFailure(_)));
        assert_eq!(state, before);
        assert_eq!(ps, 5);
    }

    #[test]
    fn provider_error_is_witness_failure() {
        let mut state = ledger();
        let t = ClaimTransition::new(BrokenWitness);
        let err = t.claim(&mut state, &mut (), 10_800_000, 106_600_000).unwrap_err();
        assert!(matches!(err, ClaimError::WitnessFailure(msg) if msg.contains("locked")));
    }

    #[test]
    fn used_nullifier_is_already_claimed() {
        let secret = DeviceSecret::new([3; 32]);
        let base = ledger();
        let n = derive_nullifier(&Sha256Oracle, 0, &secret, base.event_id());
        let registry: NullifierRegistry = std::iter::once(n).collect();
        let mut state =
            LedgerState::from_parts(*base.event_id(), *base.bounding_box(), 0, registry);
        let before = state.clone();

        let t = ClaimTransition::new(FixedWitness::new(vec![3; 32]));
        let err = t.claim(&mut state, &mut 0, 10_800_000, 106_600_000).unwrap_err();
        assert_eq!(err, ClaimError::AlreadyClaimed);
        assert_eq!(state, before);
    }

    #[test]
    fn exhausted_round_is_refused() {
        let base = ledger();
        let mut state = LedgerState::from_parts(
            *base.event_id(),
            *base.bounding_box(),
            u64::MAX,
            NullifierRegistry::new(),
        );
        let t = ClaimTransition::new(FixedWitness::new(vec![3; 32]));
        let err = t.claim(&mut state, &mut 0, 10_800_000, 106_600_000).unwrap_err();
        assert_eq!(err, ClaimError::RoundExhausted);
        assert_eq!(state.round(), u64::MAX);
    }

    #[test]
    fn oracle_choice_changes_the_nullifier() {
        let state = ledger();
        let sha = ClaimTransition::new(FixedWitness::new(vec![4; 32]));
        let b2 = ClaimTransition::with_oracle(FixedWitness::new(vec![4; 32]), Blake2bOracle);
        let a = sha.prepare(&state, &0, 10_800_000, 106_600_000).unwrap();
        let b = b2.prepare(&state, &0, 10_800_000, 106_600_000).unwrap();
        assert_ne!(a.effect.nullifier, b.effect.nullifier);
        assert_eq!(a.effect.round, b.effect.round);
    }

    #[test]
    fn effect_program_guards_round() {
        let effect = ClaimEffect {
            nullifier: Nullifier::new([5; 32]),
            round: 7,
        };
        assert_eq!(
            effect.program(),
            vec![
                LedgerOp::ExpectRound(7),
                LedgerOp::InsertNullifier(Nullifier::new([5; 32])),
                LedgerOp::SetRound(8),
            ]
        );
    }
}
