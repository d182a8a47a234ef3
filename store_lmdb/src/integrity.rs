//! LMDB database integrity checks.
//!
//! Run on open to detect corruption before any claim is processed.

use std::path::Path;

use geopass_store::{CellStore, LedgerCell, NullifierStore};

use crate::environment::LmdbEnvironment;
use crate::ledger::read_cell_in;
use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Databases that exist in every GeoPass LMDB environment.
const EXPECTED_DATABASES: &[&str] = &["meta", "nullifiers"];

/// Count entries in every expected database and, once genesis is written,
/// check that every scalar cell is present and the nullifier count equals
/// the round.
///
/// Read failures are recorded in the report rather than causing a hard error.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    {
        let rtxn = env.env().read_txn()?;
        for &db_name in EXPECTED_DATABASES {
            match env
                .env()
                .open_database::<heed::types::Bytes, heed::types::Bytes>(&rtxn, Some(db_name))
            {
                Ok(Some(db)) => {
                    report.databases_checked += 1;
                    match db.len(&rtxn) {
                        Ok(count) => report.total_entries += count,
                        Err(e) => report
                            .errors
                            .push(format!("failed to read database '{}': {}", db_name, e)),
                    }
                }
                Ok(None) => report
                    .errors
                    .push(format!("database '{}' is missing", db_name)),
                Err(e) => report
                    .errors
                    .push(format!("failed to open database '{}': {}", db_name, e)),
            }
        }
    }

    let store = env.ledger_store();
    match store.is_initialized() {
        Ok(true) => {
            {
                let rtxn = env.env().read_txn()?;
                for cell in LedgerCell::ALL {
                    if cell == LedgerCell::UsedNullifiers {
                        continue;
                    }
                    match read_cell_in(&rtxn, &store.meta_db, cell) {
                        Ok(Some(_)) => {}
                        Ok(None) => report
                            .errors
                            .push(format!("cell '{}' is missing", cell.key())),
                        Err(e) => report.errors.push(e.to_string()),
                    }
                }
            }
            match (store.get_round(), store.nullifier_count()) {
                (Ok(round), Ok(count)) if round != count => report.errors.push(format!(
                    "round is {} but {} nullifiers are stored",
                    round, count
                )),
                (Err(e), _) | (_, Err(e)) => report.errors.push(e.to_string()),
                _ => {}
            }
        }
        Ok(false) => {}
        Err(e) => report.errors.push(e.to_string()),
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
