//! Shared utilities for GeoPass binaries.

pub mod logging;

pub use logging::{init_logging, LogFormat};
