//! Metadata storage trait.

use crate::StoreError;

/// Schema version written by current backends.
pub const SCHEMA_VERSION: u32 = 1;

/// Trait for storing database metadata (schema version, hash oracle name, etc.).
///
/// This is a generic key-value store for internal bookkeeping that doesn't
/// belong in a ledger cell.
pub trait MetaStore {
    /// Store a metadata value.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a metadata value.
    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Get the current database schema version (0 if never written).
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    /// Set the database schema version.
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
