//! Used-nullifier set storage trait.

use crate::StoreError;
use geopass_types::Nullifier;

/// Read access to the persisted used-nullifier set.
///
/// Inserts only happen through [`crate::LedgerStore::apply`].
pub trait NullifierStore {
    fn nullifier_exists(&self, nullifier: &Nullifier) -> Result<bool, StoreError>;

    fn nullifier_count(&self) -> Result<u64, StoreError>;

    /// All stored nullifiers. Order carries no meaning.
    fn iter_nullifiers(&self) -> Result<Vec<Nullifier>, StoreError>;
}
