//! Error types for strategy configuration.

use thiserror::Error;

/// Result type for control strategy operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors raised while validating a strategy configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A speed setting is non-finite or not positive.
    #[error("Invalid speed for {what}: {value} rpm")]
    InvalidSpeed { what: &'static str, value: f64 },

    /// Continuous speed bounds are inverted.
    #[error("Invalid speed bounds: lower {lo} rpm exceeds upper {hi} rpm")]
    InvertedBounds { lo: f64, hi: f64 },
}
