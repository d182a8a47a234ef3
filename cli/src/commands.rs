//! Subcommand implementations.

use std::path::Path;

use anyhow::{bail, Context};
use geopass_crypto::{Blake2bOracle, HashOracle};
use geopass_ledger::{
    genesis_program, ClaimTransition, DeviceKeyWitness, GenesisConfig, LedgerSnapshot, LedgerState,
    PersistentLedger,
};
use geopass_store::{CellStore, MetaStore, StoreError};
use geopass_store_lmdb::environment::DEFAULT_MAP_SIZE;
use geopass_store_lmdb::integrity::{check_data_dir, check_integrity};
use geopass_store_lmdb::{LmdbEnvironment, LmdbLedgerStore};
use geopass_types::{CoordinateEncoding, ScaledPoint};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{CliConfig, OracleKind};
use crate::keyfile::{save_key_file, KeyFile};

/// Metadata key holding [`EventMeta`] as JSON.
const EVENT_META_KEY: &str = "geopass_event";

/// Settings fixed at init that claims must reuse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventMeta {
    pub hash_oracle: OracleKind,
    pub encoding: CoordinateEncoding,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub center: Option<[f64; 2]>,
}

/// Where a claim's coordinates come from.
#[derive(Clone, Copy, Debug)]
pub enum ClaimPoint {
    Degrees { lat: f64, lon: f64 },
    Scaled(ScaledPoint),
}

fn open_env(config: &CliConfig) -> anyhow::Result<LmdbEnvironment> {
    let dir = config.ledger_dir();
    check_data_dir(&dir).map_err(anyhow::Error::msg)?;
    let env = LmdbEnvironment::open(&dir, DEFAULT_MAP_SIZE)
        .with_context(|| format!("opening ledger at {}", dir.display()))?;
    let report = check_integrity(&env)?;
    for e in &report.errors {
        warn!(error = %e, "integrity check");
    }
    Ok(env)
}

fn open_existing(config: &CliConfig) -> anyhow::Result<LmdbEnvironment> {
    let dir = config.ledger_dir();
    if !dir.exists() {
        bail!(
            "no ledger at {}; run `geopass init` first",
            dir.display()
        );
    }
    open_env(config)
}

fn read_event_meta(store: &LmdbLedgerStore) -> anyhow::Result<EventMeta> {
    let bytes = store
        .get_meta(EVENT_META_KEY)
        .context("ledger has no event metadata")?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn init(config: &CliConfig, force: bool) -> anyhow::Result<()> {
    let genesis = config.event.genesis()?;
    let issues = genesis.ordering_issues();
    if !issues.is_empty() {
        if !force {
            bail!(
                "bounding box would reject every claim: {}; pass --force to create it anyway",
                issues.join(", ")
            );
        }
        warn!(issues = %issues.join(", "), "creating ledger with inverted bounding box");
    }

    let env = open_env(config)?;
    let store = env.ledger_store();
    if store.is_initialized()? {
        bail!("ledger at {} is already initialised", config.ledger_dir().display());
    }

    let meta = EventMeta {
        hash_oracle: config.hash_oracle,
        encoding: config.event.encoding,
        name: config.event.name.clone(),
        location: config.event.location.clone(),
        center: config.event.center,
    };
    write_genesis(&store, &genesis, &serde_json::to_vec(&meta)?)?;

    let ledger = PersistentLedger::open(store)?;
    info!(oracle = config.hash_oracle.as_str(), "genesis written");
    println!("event    {}", ledger.state().event_id());
    println!("bbox     {}", ledger.state().bounding_box());
    println!("round    {}", ledger.state().round());
    Ok(())
}

/// Genesis cells and event metadata in one write transaction.
fn write_genesis(
    store: &LmdbLedgerStore,
    genesis: &GenesisConfig,
    meta: &[u8],
) -> Result<(), StoreError> {
    let mut batch = store.write_batch()?;
    for op in genesis_program(genesis) {
        batch.run(&op)?;
    }
    batch.put_meta(EVENT_META_KEY, meta)?;
    batch.commit()
}

pub fn claim(config: &CliConfig, point: ClaimPoint) -> anyhow::Result<()> {
    let env = open_existing(config)?;
    let store = env.ledger_store();
    let meta = read_event_meta(&store)?;
    let scaled = match point {
        ClaimPoint::Degrees { lat, lon } => meta.encoding.encode(lat, lon)?,
        ClaimPoint::Scaled(p) => p,
    };

    let key_path = config.device_key_path();
    let KeyFile { key, mut claims } = KeyFile::load(&key_path)?;
    let witness = DeviceKeyWitness::new(key);
    let mut ledger = PersistentLedger::open(store)?;

    let round = match meta.hash_oracle {
        OracleKind::Sha256 => submit(
            &mut ledger,
            &ClaimTransition::new(witness),
            &mut claims,
            scaled,
            &key_path,
        )?,
        OracleKind::Blake2b => submit(
            &mut ledger,
            &ClaimTransition::with_oracle(witness, Blake2bOracle),
            &mut claims,
            scaled,
            &key_path,
        )?,
    };
    println!("claim accepted at round {round}; ledger round is now {}", ledger.state().round());
    Ok(())
}

fn submit<H: HashOracle>(
    ledger: &mut PersistentLedger<LmdbLedgerStore>,
    transition: &ClaimTransition<DeviceKeyWitness, H>,
    claims: &mut u64,
    point: ScaledPoint,
    key_path: &Path,
) -> anyhow::Result<u64> {
    let round = ledger.state().round();
    ledger.claim(transition, claims, point.lat, point.lon)?;
    if let Err(e) = save_key_file(key_path, transition.witness().key(), *claims) {
        warn!(round, error = %e, "claim accepted but device key file not updated");
        return Err(e.context(format!(
            "claim accepted at round {round}, but the device key file was not updated"
        )));
    }
    Ok(round)
}

pub fn status(config: &CliConfig, json: bool) -> anyhow::Result<()> {
    let env = open_existing(config)?;
    let store = env.ledger_store();
    let meta = read_event_meta(&store)?;
    let ledger = PersistentLedger::open(store)?;
    let summary = ledger.summary()?;

    if json {
        let value = serde_json::json!({
            "event_id": summary.event_id.to_string(),
            "bbox": summary.bbox,
            "round": summary.round,
            "nullifiers": summary.nullifiers,
            "meta": meta,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if let Some(name) = &meta.name {
        println!("name        {name}");
    }
    if let Some(location) = &meta.location {
        println!("location    {location}");
    }
    println!("event       {}", summary.event_id);
    println!("bbox        {}", summary.bbox);
    println!("encoding    {:?}", meta.encoding);
    println!("oracle      {}", meta.hash_oracle.as_str());
    println!("round       {}", summary.round);
    println!("nullifiers  {}", summary.nullifiers);
    Ok(())
}

pub fn nullifiers(config: &CliConfig) -> anyhow::Result<()> {
    let env = open_existing(config)?;
    let ledger = PersistentLedger::open(env.ledger_store())?;
    for n in ledger.state().used_nullifiers().sorted() {
        println!("{n}");
    }
    Ok(())
}

pub fn export(config: &CliConfig, out: Option<&Path>) -> anyhow::Result<()> {
    let env = open_existing(config)?;
    let ledger = PersistentLedger::open(env.ledger_store())?;
    let snapshot = ledger.snapshot();
    let json = serde_json::to_string_pretty(&snapshot)?;
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), round = snapshot.round, "snapshot exported");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Check a snapshot file's hash and contents, printing its round.
pub fn verify(path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let snapshot: LedgerSnapshot = serde_json::from_str(&raw)?;
    let state = LedgerState::from_snapshot(&snapshot)?;
    println!(
        "snapshot ok: event {} round {} nullifiers {}",
        state.event_id(),
        state.round(),
        state.used_nullifiers().size()
    );
    Ok(())
}

pub fn device_key(config: &CliConfig, force: bool) -> anyhow::Result<()> {
    let path = config.device_key_path();
    KeyFile::create(&path, force)?;
    println!("device key written to {}", path.display());
    Ok(())
}
