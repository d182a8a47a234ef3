//! LMDB storage backend for the GeoPass claim ledger.
//!
//! Implements the storage traits from `geopass-store` using the `heed` LMDB
//! bindings. Scalar ledger cells live in the `meta` database next to the
//! schema version; the used-nullifier set is the `nullifiers` database.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod ledger;
pub mod meta;
pub mod migration;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use ledger::LmdbLedgerStore;
pub use write_batch::WriteBatch;
