//! GeoPass command line: create an event ledger, submit location claims,
//! inspect and export the ledger.

mod commands;
mod config;
mod keyfile;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use geopass_ledger::LedgerError;
use geopass_types::ScaledPoint;
use geopass_utils::{init_logging, LogFormat};

use crate::commands::ClaimPoint;
use crate::config::{CliConfig, OracleKind};

#[derive(Parser)]
#[command(name = "geopass", version, about = "GeoPass proof-of-location claim ledger")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "GEOPASS_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory holding the ledger and, by default, the device key.
    #[arg(long, env = "GEOPASS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Device key file.
    #[arg(long, env = "GEOPASS_DEVICE_KEY")]
    device_key: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GEOPASS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "GEOPASS_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write genesis for the configured event.
    Init {
        /// Hash oracle used for nullifiers, fixed for the ledger's lifetime.
        #[arg(long, value_enum)]
        oracle: Option<OracleKind>,

        /// Create the ledger even if the bounding box is inverted.
        #[arg(long)]
        force: bool,
    },

    /// Submit a claim from the given position.
    Claim {
        /// Latitude in degrees.
        #[arg(long, allow_hyphen_values = true, requires = "lon", conflicts_with_all = ["lat_e6", "lon_e6"])]
        lat: Option<f64>,

        /// Longitude in degrees.
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        /// Latitude already in the ledger's scaled encoding.
        #[arg(long, requires = "lon_e6")]
        lat_e6: Option<u32>,

        /// Longitude already in the ledger's scaled encoding.
        #[arg(long, requires = "lat_e6", conflicts_with = "lon")]
        lon_e6: Option<u32>,
    },

    /// Show the ledger summary.
    Status {
        #[arg(long)]
        json: bool,
    },

    /// List used nullifiers in hex, sorted.
    Nullifiers,

    /// Write a verifiable JSON snapshot of the ledger.
    Export {
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Check a snapshot file.
    Verify { file: PathBuf },

    /// Create a new device key file.
    DeviceKey {
        /// Replace an existing key file.
        #[arg(long)]
        force: bool,
    },
}

/// Exit status for a rejected claim, distinct from operational failures.
const EXIT_REJECTED: u8 = 2;

fn load_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(key) = &cli.device_key {
        config.device_key = Some(key.clone());
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn run(cli: Cli, mut config: CliConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::Init { oracle, force } => {
            if let Some(oracle) = oracle {
                config.hash_oracle = oracle;
            }
            commands::init(&config, force)
        }
        Command::Claim {
            lat,
            lon,
            lat_e6,
            lon_e6,
        } => {
            let point = match (lat, lon, lat_e6, lon_e6) {
                (Some(lat), Some(lon), None, None) => ClaimPoint::Degrees { lat, lon },
                (None, None, Some(lat), Some(lon)) => ClaimPoint::Scaled(ScaledPoint { lat, lon }),
                _ => anyhow::bail!("give either --lat/--lon or --lat-e6/--lon-e6"),
            };
            commands::claim(&config, point)
        }
        Command::Status { json } => commands::status(&config, json),
        Command::Nullifiers => commands::nullifiers(&config),
        Command::Export { out } => commands::export(&config, out.as_deref()),
        Command::Verify { file } => commands::verify(&file),
        Command::DeviceKey { force } => commands::device_key(&config, force),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.log_format, &config.log_level);

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(reason) = e.downcast_ref::<LedgerError>().and_then(|l| l.as_claim()) {
                eprintln!("claim rejected: {reason}");
                return ExitCode::from(EXIT_REJECTED);
            }
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
