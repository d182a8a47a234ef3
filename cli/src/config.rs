//! CLI configuration with TOML file support.
//!
//! ```toml
//! data_dir = "./geopass_data"
//! log_format = "human"
//! hash_oracle = "sha256"
//!
//! [event]
//! label = "hcmc-meetup"
//! name = "Saigon builders meetup"
//! center = [10.8231, 106.6297]
//! encoding = "plain"
//!
//! [event.bbox]
//! lat_min = 10.70
//! lat_max = 10.95
//! lon_min = 106.50
//! lon_max = 106.90
//! ```

use std::path::{Path, PathBuf};

use geopass_ledger::GenesisConfig;
use geopass_types::{BoundingBox, CoordinateEncoding, EventId, TypesError};
use geopass_utils::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("event needs either `id` or `label`")]
    MissingEventId,

    #[error("event has no bounding box")]
    MissingBoundingBox,

    #[error(transparent)]
    Types(#[from] TypesError),
}

/// Which hash oracle nullifiers are derived with. Fixed per ledger at init.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    #[default]
    Sha256,
    Blake2b,
}

impl OracleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake2b => "blake2b-256",
        }
    }
}

/// Bounding box edges in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BboxDegrees {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

/// The `[event]` table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventConfig {
    /// 32-byte event id in hex. Takes precedence over `label`.
    #[serde(default)]
    pub id: Option<String>,

    /// Human label hashed into an event id.
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    /// `[lat, lon]` in degrees, informational.
    #[serde(default)]
    pub center: Option<[f64; 2]>,

    #[serde(default)]
    pub encoding: CoordinateEncoding,

    #[serde(default)]
    pub bbox: Option<BboxDegrees>,
}

impl EventConfig {
    pub fn event_id(&self) -> Result<EventId, ConfigError> {
        match (&self.id, &self.label) {
            (Some(hex), _) => Ok(EventId::from_hex(hex)?),
            (None, Some(label)) => Ok(EventId::from_label(label)),
            (None, None) => Err(ConfigError::MissingEventId),
        }
    }

    pub fn bounding_box(&self) -> Result<BoundingBox, ConfigError> {
        let b = self.bbox.ok_or(ConfigError::MissingBoundingBox)?;
        Ok(BoundingBox::new(
            self.encoding.encode_lat(b.lat_min)?,
            self.encoding.encode_lat(b.lat_max)?,
            self.encoding.encode_lon(b.lon_min)?,
            self.encoding.encode_lon(b.lon_max)?,
        ))
    }

    pub fn genesis(&self) -> Result<GenesisConfig, ConfigError> {
        Ok(GenesisConfig::new(self.event_id()?, self.bounding_box()?))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Device key file; defaults to `<data_dir>/device.key`.
    #[serde(default)]
    pub device_key: Option<PathBuf>,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub hash_oracle: OracleKind,

    #[serde(default)]
    pub event: EventConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./geopass_data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            device_key: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            hash_oracle: OracleKind::default(),
            event: EventConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// LMDB environment directory.
    pub fn ledger_dir(&self) -> PathBuf {
        self.data_dir.join("ledger")
    }

    pub fn device_key_path(&self) -> PathBuf {
        self.device_key
            .clone()
            .unwrap_or_else(|| self.data_dir.join("device.key"))
    }
}
