//! End-to-end claim scenarios against in-memory and nullable-store ledgers.

use geopass_crypto::{derive_nullifier, Sha256Oracle};
use geopass_ledger::{
    init, BoundaryViolation, ClaimError, ClaimTransition, GenesisConfig, LedgerError,
    LedgerSnapshot, LedgerState, PersistentLedger,
};
use geopass_nullables::{NullLedgerStore, NullWitness};
use geopass_store::{CellStore, LedgerOp, LedgerStore, NullifierStore, StoreError};
use geopass_types::{BoundingBox, DeviceSecret, EventId};

const LAT_MIN: u32 = 10_700_000;
const LAT_MAX: u32 = 10_950_000;
const LON_MIN: u32 = 106_500_000;
const LON_MAX: u32 = 106_900_000;

const S1: [u8; 32] = [0x5A; 32];

fn event_one() -> EventId {
    let mut id = [0u8; 32];
    id[31] = 1;
    EventId::new(id)
}

fn hcmc() -> LedgerState {
    init(event_one(), LAT_MIN, LAT_MAX, LON_MIN, LON_MAX)
}

fn genesis() -> GenesisConfig {
    GenesisConfig::new(event_one(), BoundingBox::new(LAT_MIN, LAT_MAX, LON_MIN, LON_MAX))
}

#[test]
fn same_secret_claims_again_in_the_next_round() {
    let mut state = hcmc();
    let mut ps = 0;
    let t = ClaimTransition::new(NullWitness::constant(S1));

    t.claim(&mut state, &mut ps, 10_800_000, 106_600_000).unwrap();
    assert_eq!(state.round(), 1);
    assert_eq!(state.used_nullifiers().size(), 1);

    // Round advanced, so the same secret yields a different nullifier.
    t.claim(&mut state, &mut ps, 10_800_000, 106_600_000).unwrap();
    assert_eq!(state.round(), 2);
    assert_eq!(state.used_nullifiers().size(), 2);

    let secret = DeviceSecret::new(S1);
    let n0 = derive_nullifier(&Sha256Oracle, 0, &secret, &event_one());
    let n1 = derive_nullifier(&Sha256Oracle, 1, &secret, &event_one());
    assert_ne!(n0, n1);
    assert!(state.used_nullifiers().member(&n0));
    assert!(state.used_nullifiers().member(&n1));
    assert_eq!(ps, 2);
}

#[test]
fn out_of_region_claim_changes_nothing() {
    let mut state = hcmc();
    let before = state.clone();
    let t = ClaimTransition::new(NullWitness::constant(S1));

    let err = t.claim(&mut state, &mut 0, 10_000_000, 106_600_000).unwrap_err();
    assert_eq!(err, ClaimError::Boundary(BoundaryViolation::LatitudeBelowMin));
    assert_eq!(state.round(), 0);
    assert!(state.used_nullifiers().is_empty());
    assert_eq!(state, before);
    assert_eq!(t.witness().calls(), 0);
}

#[test]
fn every_edge_is_inclusive() {
    let t = ClaimTransition::new(NullWitness::new(vec![[1; 32], [2; 32], [3; 32], [4; 32]]));
    let mut state = hcmc();
    let mut ps = 0;
    let mid_lon = 106_600_000;
    let mid_lat = 10_800_000;

    t.claim(&mut state, &mut ps, LAT_MIN, mid_lon).unwrap();
    t.claim(&mut state, &mut ps, LAT_MAX, mid_lon).unwrap();
    t.claim(&mut state, &mut ps, mid_lat, LON_MIN).unwrap();
    t.claim(&mut state, &mut ps, mid_lat, LON_MAX).unwrap();
    assert_eq!(state.round(), 4);

    let cases = [
        (LAT_MIN - 1, mid_lon, BoundaryViolation::LatitudeBelowMin),
        (LAT_MAX + 1, mid_lon, BoundaryViolation::LatitudeAboveMax),
        (mid_lat, LON_MIN - 1, BoundaryViolation::LongitudeBelowMin),
        (mid_lat, LON_MAX + 1, BoundaryViolation::LongitudeAboveMax),
    ];
    for (lat, lon, reason) in cases {
        assert_eq!(
            t.claim(&mut state, &mut ps, lat, lon),
            Err(ClaimError::Boundary(reason))
        );
    }
    assert_eq!(state.round(), 4);
}

#[test]
fn malformed_witness_secret_is_witness_failure() {
    let mut state = hcmc();
    let t = ClaimTransition::new(NullWitness::raw(vec![0; 31]));
    let err = t.claim(&mut state, &mut 0, 10_800_000, 106_600_000).unwrap_err();
    assert!(matches!(err, ClaimError::WitnessFailure(_)));
    assert_eq!(state.round(), 0);

    let t = ClaimTransition::new(NullWitness::failing("enclave offline"));
    let err = t.claim(&mut state, &mut 0, 10_800_000, 106_600_000).unwrap_err();
    assert!(matches!(err, ClaimError::WitnessFailure(_)));
    assert!(state.used_nullifiers().is_empty());
}

#[test]
fn inverted_genesis_rejects_every_claim() {
    let mut state = init(event_one(), LAT_MAX, LAT_MIN, LON_MIN, LON_MAX);
    let t = ClaimTransition::new(NullWitness::constant(S1));
    for lat in [LAT_MIN, 10_800_000, LAT_MAX] {
        assert!(matches!(
            t.claim(&mut state, &mut 0, lat, 106_600_000),
            Err(ClaimError::Boundary(_))
        ));
    }
    assert_eq!(state.round(), 0);
}

#[test]
fn persistent_ledger_mirrors_the_store() {
    let mut ledger = PersistentLedger::init(NullLedgerStore::new(), &genesis()).unwrap();
    let t = ClaimTransition::new(NullWitness::constant(S1));
    let mut ps = 0;

    ledger.claim(&t, &mut ps, 10_800_000, 106_600_000).unwrap();
    ledger.claim(&t, &mut ps, 10_800_000, 106_600_000).unwrap();

    let store = ledger.store();
    assert_eq!(store.get_round().unwrap(), 2);
    assert_eq!(store.nullifier_count().unwrap(), 2);
    assert_eq!(ledger.state().round(), 2);

    let summary = ledger.summary().unwrap();
    assert_eq!(summary.round, 2);
    assert_eq!(summary.nullifiers, 2);
    assert_eq!(summary.event_id, event_one());

    ledger.reload().unwrap();
    assert_eq!(ledger.state().used_nullifiers().size(), 2);
}

#[test]
fn persistent_rejection_leaves_store_untouched() {
    let mut ledger = PersistentLedger::init(NullLedgerStore::new(), &genesis()).unwrap();
    let t = ClaimTransition::new(NullWitness::constant(S1));
    let mut ps = 0;

    let err = ledger.claim(&t, &mut ps, 10_000_000, 106_600_000).unwrap_err();
    assert!(matches!(
        err.as_claim(),
        Some(ClaimError::Boundary(BoundaryViolation::LatitudeBelowMin))
    ));
    assert_eq!(ledger.store().applied_count(), 1);
    assert_eq!(ledger.store().get_round().unwrap(), 0);
    assert_eq!(ps, 0);
}

#[test]
fn store_failure_rolls_back_both_sides() {
    let mut ledger = PersistentLedger::init(NullLedgerStore::new(), &genesis()).unwrap();
    let t = ClaimTransition::new(NullWitness::constant(S1));
    let mut ps = 0;

    ledger.store().fail_next_apply("disk full");
    let err = ledger.claim(&t, &mut ps, 10_800_000, 106_600_000).unwrap_err();
    assert!(matches!(err, LedgerError::Storage(StoreError::Backend(_))));
    assert_eq!(ledger.state().round(), 0);
    assert!(ledger.state().used_nullifiers().is_empty());
    assert_eq!(ledger.store().nullifier_count().unwrap(), 0);
    assert_eq!(ps, 0);

    // The same claim goes through once the store recovers.
    ledger.claim(&t, &mut ps, 10_800_000, 106_600_000).unwrap();
    assert_eq!(ledger.state().round(), 1);
}

#[test]
fn nullifier_already_in_the_store_is_already_claimed() {
    let store = NullLedgerStore::new();
    let mut state = geopass_ledger::init_persistent(&store, &genesis()).unwrap();
    let seeded = derive_nullifier(&Sha256Oracle, 0, &DeviceSecret::new(S1), &event_one());
    store.apply(&[LedgerOp::InsertNullifier(seeded)]).unwrap();

    let t = ClaimTransition::new(NullWitness::constant(S1));
    let mut ps = 0;
    let err = geopass_ledger::claim_persistent(&store, &mut state, &t, &mut ps, 10_800_000, 106_600_000)
        .unwrap_err();
    assert!(matches!(err, LedgerError::Claim(ClaimError::AlreadyClaimed)));
    assert_eq!(store.get_round().unwrap(), 0);
    assert_eq!(store.nullifier_count().unwrap(), 1);
    assert_eq!(state.round(), 0);
    assert!(state.used_nullifiers().is_empty());
    assert_eq!(ps, 0);
}

#[test]
fn genesis_cannot_overwrite_a_ledger() {
    let store = NullLedgerStore::new();
    let ledger = PersistentLedger::init(store, &genesis()).unwrap();
    let other = GenesisConfig::new(EventId::ZERO, BoundingBox::new(0, 1, 0, 1));
    let err = geopass_ledger::init_persistent(ledger.store(), &other).unwrap_err();
    assert!(matches!(err, LedgerError::Storage(StoreError::AlreadyInitialized)));
    assert_eq!(ledger.store().get_event_id().unwrap(), event_one());
}

#[test]
fn opening_an_empty_store_fails() {
    let err = PersistentLedger::open(NullLedgerStore::new()).err().unwrap();
    assert!(matches!(err, LedgerError::Storage(StoreError::NotInitialized)));
}

#[test]
fn snapshot_restores_the_same_state() {
    let mut state = hcmc();
    let t = ClaimTransition::new(NullWitness::new(vec![[7; 32], [8; 32], [9; 32]]));
    let mut ps = 0;
    for _ in 0..3 {
        t.claim(&mut state, &mut ps, 10_800_000, 106_600_000).unwrap();
    }

    let snap = LedgerSnapshot::create(&state);
    let restored = LedgerState::from_snapshot(&LedgerSnapshot::from_bytes(&snap.to_bytes().unwrap()).unwrap()).unwrap();
    assert_eq!(restored, state);
}
