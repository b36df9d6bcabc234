//! Decode errors.

use std::fmt;

use thiserror::Error;

/// Kind of tracked body a telemetry slice describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Car,
    Ball,
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Car => f.write_str("car"),
            Body::Ball => f.write_str("ball"),
        }
    }
}

/// Errors raised while interpreting raw telemetry.
///
/// Degenerate numeric inputs (zero-length vectors, zero-norm quaternions) are
/// not represented here; the math helpers return documented fallback values
/// for those instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// A decode call received a slice of the wrong length.
    #[error("Malformed {body} telemetry: got {got} values, expected {expected}")]
    MalformedTelemetry {
        /// Body the slice was decoded as
        body: Body,
        /// Required slice length
        expected: usize,
        /// Length actually received
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
