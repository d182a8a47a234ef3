//! Device key file: the durable key plus the witness's private counter.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};
use geopass_crypto::generate_device_key;
use geopass_types::DeviceKey;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct KeyFileRecord {
    key: String,
    #[serde(default)]
    claims: u64,
}

/// A device key loaded from disk with the number of accepted claims it has
/// backed.
pub struct KeyFile {
    pub key: DeviceKey,
    pub claims: u64,
}

impl KeyFile {
    /// Create a fresh key file. Refuses to overwrite unless `force` is set.
    pub fn create(path: &Path, force: bool) -> anyhow::Result<Self> {
        if path.exists() && !force {
            bail!(
                "{} already exists; pass --force to replace it",
                path.display()
            );
        }
        let file = Self {
            key: generate_device_key(),
            claims: 0,
        };
        save_key_file(path, &file.key, file.claims)?;
        Ok(file)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut raw = fs::read_to_string(path)
            .with_context(|| format!("reading device key {}", path.display()))?;
        let parsed = serde_json::from_str::<KeyFileRecord>(&raw);
        raw.zeroize();
        let record = parsed.with_context(|| format!("parsing device key {}", path.display()))?;
        let key = DeviceKey::from_hex(&record.key)?;
        Ok(Self {
            key,
            claims: record.claims,
        })
    }
}

/// Write `key` and `claims` to `path`, owner-readable only on unix.
pub fn save_key_file(path: &Path, key: &DeviceKey, claims: u64) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let record = KeyFileRecord {
        key: key.to_hex(),
        claims,
    };
    let mut json = serde_json::to_string_pretty(&record)?;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let result = options
        .open(path)
        .and_then(|mut f| f.write_all(json.as_bytes()))
        .with_context(|| format!("writing device key {}", path.display()));
    json.zeroize();
    result
}
