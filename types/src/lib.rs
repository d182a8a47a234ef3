//! Fundamental types for the GeoPass claim ledger.
//!
//! This crate defines the values shared across every other crate in the workspace:
//! event identifiers, nullifiers, device secrets, the geofence bounding box, and the
//! caller-side coordinate encoding.

pub mod coords;
pub mod error;
pub mod event;
pub mod geofence;
pub mod hash;
pub mod keys;

pub use coords::{CoordinateEncoding, ScaledPoint};
pub use error::TypesError;
pub use event::EventId;
pub use geofence::BoundingBox;
pub use hash::Nullifier;
pub use keys::{DeviceKey, DeviceSecret, DEVICE_SECRET_LEN};
