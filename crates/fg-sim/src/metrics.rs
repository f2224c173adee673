//! Time-integrated performance metrics.

use crate::frame::SimulationFrame;
use fg_controls::StrategyKind;
use fg_core::EPSILON;
use fg_core::units::{Energy, wh};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Aggregate performance of one strategy over a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub strategy: StrategyKind,
    /// Electrical energy (Wh)
    pub energy_wh: f64,
    /// Delivered airflow integrated over time (cfm·h)
    pub delivered_cfm_h: f64,
    /// Shortfall integrated over time (cfm·h)
    pub shortfall_cfm_h: f64,
    /// Oversupply integrated over time (cfm·h)
    pub oversupply_cfm_h: f64,
    /// Share of steps within tolerance (%)
    pub compliance_pct: f64,
    /// Specific fan power (Wh per cfm·h, i.e. W/cfm)
    pub sfp: f64,
    /// Energy plus weighted shortfall
    pub objective: f64,
    /// Number of steps reduced
    pub steps: usize,
}

impl AggregateMetrics {
    pub fn energy(&self) -> Energy {
        wh(self.energy_wh)
    }
}

/// Reduce `frames` for one strategy in chronological order.
///
/// Each integral is a plain sum of the per-step values multiplied once by
/// `dt / 3600`.
pub fn aggregate(
    frames: &[SimulationFrame],
    kind: StrategyKind,
    dt_s: f64,
    shortfall_penalty: f64,
) -> AggregateMetrics {
    let mut power = 0.0;
    let mut delivered = 0.0;
    let mut shortfall = 0.0;
    let mut oversupply = 0.0;
    let mut compliant = 0usize;

    for frame in frames {
        let step = frame.step(kind);
        power += step.power;
        delivered += step.airflow;
        shortfall += step.shortfall;
        oversupply += step.oversupply;
        if step.compliant {
            compliant += 1;
        }
    }

    let hours = dt_s / SECONDS_PER_HOUR;
    let energy_wh = power * hours;
    let delivered_cfm_h = delivered * hours;
    let shortfall_cfm_h = shortfall * hours;
    let compliance_pct = if frames.is_empty() {
        0.0
    } else {
        100.0 * compliant as f64 / frames.len() as f64
    };

    AggregateMetrics {
        strategy: kind,
        energy_wh,
        delivered_cfm_h,
        shortfall_cfm_h,
        oversupply_cfm_h: oversupply * hours,
        compliance_pct,
        sfp: energy_wh / delivered_cfm_h.max(EPSILON),
        objective: energy_wh + shortfall_penalty * shortfall_cfm_h,
        steps: frames.len(),
    }
}
