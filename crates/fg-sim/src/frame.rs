//! Per-timestep simulation records.

use fg_controls::{ControlDecision, StrategyKind};
use serde::{Deserialize, Serialize};

/// Outcome of one strategy at one timestep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyStep {
    /// Speed (rpm)
    pub speed: f64,
    /// Delivered airflow (cfm)
    pub airflow: f64,
    /// Electrical power (W)
    pub power: f64,
    /// Delivered airflow within tolerance of demand
    pub compliant: bool,
    /// Under-delivery beyond the tolerance band (cfm)
    pub shortfall: f64,
    /// Over-delivery beyond the tolerance band (cfm)
    pub oversupply: f64,
}

impl StrategyStep {
    /// Classify a decision against `demand` with tolerance band `tol`.
    ///
    /// Shortfall and oversupply are measured outside the band, so a
    /// compliant step has neither.
    pub fn classify(decision: ControlDecision, demand: f64, tol: f64) -> Self {
        let airflow = decision.airflow;
        Self {
            speed: decision.speed,
            airflow,
            power: decision.power,
            compliant: (airflow - demand).abs() <= tol,
            shortfall: (demand - airflow - tol).max(0.0),
            oversupply: (airflow - demand - tol).max(0.0),
        }
    }
}

/// One timestep: inputs plus the outcome of every strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationFrame {
    /// Time (s)
    pub time: f64,
    /// Airflow demand (cfm)
    pub demand: f64,
    /// Duct resistance coefficient (Pa/cfm²)
    pub resistance: f64,
    /// Outcomes in [`StrategyKind::ALL`] order
    pub strategies: [StrategyStep; 3],
}

impl SimulationFrame {
    pub fn step(&self, kind: StrategyKind) -> &StrategyStep {
        &self.strategies[kind.index()]
    }
}
