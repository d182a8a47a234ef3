//! Parsing and conversion errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("coordinate {value} is out of range for {axis}")]
    CoordinateOutOfRange { axis: &'static str, value: f64 },

    #[error("coordinate {value} is negative; plain encoding only accepts non-negative degrees")]
    NegativeCoordinate { value: f64 },
}
