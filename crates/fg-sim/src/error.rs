//! Error types for simulation operations.

use fg_controls::ControlError;
use thiserror::Error;

/// Malformed simulation input, reported before any step runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Series length mismatch: time={time}, demand={demand}, resistance={resistance}")]
    LengthMismatch {
        time: usize,
        demand: usize,
        resistance: usize,
    },

    #[error("Empty time series")]
    Empty,

    #[error("Non-finite {what} at index {index}: {value}")]
    NonFinite {
        what: &'static str,
        index: usize,
        value: f64,
    },

    #[error("Timestamps decrease at index {index}: {previous} -> {current}")]
    NonMonotonicTime {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Negative resistance coefficient at index {index}: {value}")]
    NegativeResistance { index: usize, value: f64 },

    #[error("Strategy configuration: {0}")]
    Control(#[from] ControlError),
}

pub type SimResult<T> = Result<T, SimError>;
