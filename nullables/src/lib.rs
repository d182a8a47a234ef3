//! Nullable infrastructure for deterministic testing.
//!
//! The external collaborators of the claim ledger (witness provider and
//! transactional store) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod store;
pub mod witness;

pub use store::NullLedgerStore;
pub use witness::NullWitness;
