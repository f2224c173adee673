//! Quadratic duct resistance.

use crate::common::check_non_negative;
use crate::error::ComponentResult;
use serde::{Deserialize, Serialize};

/// Duct system resistance curve `Δp = k·Q²`.
///
/// `k` is in Pa/cfm². A filter loading up over time is represented as a
/// sequence of coefficients, one per timestep, between a clean and a fouled
/// value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemResistance {
    /// Resistance coefficient (Pa/cfm²)
    pub k: f64,
}

impl SystemResistance {
    /// Create a resistance curve.
    ///
    /// # Errors
    /// Returns error if `k` is negative or non-finite.
    pub fn new(k: f64) -> ComponentResult<Self> {
        check_non_negative(k, "resistance coefficient must be non-negative")?;
        Ok(Self { k })
    }

    /// Pressure drop (Pa) at `airflow` (cfm).
    #[inline]
    pub fn pressure_drop(&self, airflow: f64) -> f64 {
        self.k * airflow * airflow
    }
}
