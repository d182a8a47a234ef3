//! Abstract storage traits for the GeoPass ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these traits.
//! The ledger crate depends only on the traits. Mutations are expressed as an
//! ordered [`LedgerOp`] program that a backend commits or rolls back as a whole.

pub mod cell;
pub mod error;
pub mod meta;
pub mod nullifier;
pub mod program;

pub use cell::{CellStore, LedgerCell};
pub use error::StoreError;
pub use meta::{MetaStore, SCHEMA_VERSION};
pub use nullifier::NullifierStore;
pub use program::{LedgerOp, LedgerStore};
