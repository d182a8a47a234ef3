//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::ledger::LmdbLedgerStore;
use crate::migration::Migrator;
use crate::LmdbError;

/// Default map size: 64 MiB holds roughly a million nullifiers.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

const MAX_DBS: u32 = 4;

/// Wraps the LMDB environment and the database handles of one event ledger.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    path: PathBuf,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) nullifiers_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory, creating the
    /// databases and bringing the schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("create {}: {e}", path.display())))?;

        // SAFETY: each environment directory is opened once per process; the
        // CLI holds a single `LmdbEnvironment` for its lifetime.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("meta"))?;
        let nullifiers_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some("nullifiers"))?;
        wtxn.commit()?;

        let this = Self {
            env: Arc::new(env),
            path: path.to_path_buf(),
            meta_db,
            nullifiers_db,
        };
        Migrator::run(&this.ledger_store())?;
        tracing::debug!(path = %path.display(), "lmdb environment open");
        Ok(this)
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ledger store sharing this environment.
    pub fn ledger_store(&self) -> LmdbLedgerStore {
        LmdbLedgerStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
            nullifiers_db: self.nullifiers_db,
        }
    }
}
