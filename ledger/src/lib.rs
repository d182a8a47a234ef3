//! GeoPass claim ledger.
//!
//! A participant proves, once per round, that they are inside an event's
//! geofence. Each accepted claim records a nullifier derived from the current
//! round, a private device secret and the event id, then advances the round.
//! The transition is all-or-nothing: a rejected claim leaves the ledger
//! untouched.
//!
//! The [`LedgerState`] is an owned value passed by reference into every
//! operation; [`PersistentLedger`] mirrors it into any [`geopass_store::LedgerStore`].

pub mod claim;
pub mod error;
pub mod genesis;
pub mod geofence;
pub mod ledger;
pub mod persist;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod witness;

pub use claim::{ClaimEffect, ClaimTransition, PreparedClaim};
pub use error::{BoundaryViolation, ClaimError, LedgerError};
pub use genesis::{genesis_program, init, GenesisConfig, ENTRYPOINTS};
pub use geofence::validate;
pub use ledger::{LedgerSummary, PersistentLedger};
pub use persist::{claim_persistent, init_persistent, load_ledger};
pub use registry::{AlreadyPresent, NullifierRegistry};
pub use snapshot::LedgerSnapshot;
pub use state::LedgerState;
pub use witness::{DeviceKeyWitness, WitnessError, WitnessProvider};
