//! Fan/duct operating point by dense grid search.

use fg_components::FanModel;
use fg_core::numeric::EPSILON;
use serde::{Deserialize, Serialize};

/// Default number of airflow samples between zero and free delivery.
///
/// At 800 samples the intersection error is a fraction of a percent of free
/// delivery, well inside typical demand tolerance bands.
pub const DEFAULT_GRID_POINTS: usize = 800;

/// Operating-point search configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatingPointConfig {
    /// Number of uniformly spaced airflow samples, both ends included (≥ 2)
    pub grid_points: usize,
}

impl Default for OperatingPointConfig {
    fn default() -> Self {
        Self {
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

/// Point where the fan curve meets the duct resistance curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Airflow (cfm)
    pub airflow: f64,
    /// Fan static pressure at that airflow (Pa)
    pub pressure: f64,
}

/// Find the operating point of `fan` at `speed` against `Δp = k·Q²`.
///
/// Samples `grid_points` airflows uniformly over `[0, Q_free(speed)]`,
/// evaluates both curves and returns the sample with the smallest absolute
/// pressure mismatch. On exact ties (flat regions) the lowest airflow wins.
/// A fan with no free delivery (zero speed) operates at zero airflow.
pub fn find_operating_point(
    fan: &dyn FanModel,
    k: f64,
    speed: f64,
    config: &OperatingPointConfig,
) -> OperatingPoint {
    let q_free = fan.free_delivery(speed);
    if q_free <= EPSILON {
        return OperatingPoint {
            airflow: 0.0,
            pressure: fan.pressure_at(0.0, speed),
        };
    }

    let n = config.grid_points.max(2);
    let step = q_free / (n - 1) as f64;

    let mut best_q = 0.0;
    let mut best_dp = fan.pressure_at(0.0, speed);
    let mut best_residual = best_dp.abs();

    for i in 1..n {
        // last sample pinned to free delivery, as linspace does
        let q = if i == n - 1 { q_free } else { step * i as f64 };
        let dp_fan = fan.pressure_at(q, speed);
        let residual = (dp_fan - k * q * q).abs();
        if residual < best_residual {
            best_residual = residual;
            best_q = q;
            best_dp = dp_fan;
        }
    }

    OperatingPoint {
        airflow: best_q,
        pressure: best_dp,
    }
}

/// Operating airflow (cfm) with the default grid resolution.
pub fn find_operating_airflow(fan: &dyn FanModel, k: f64, speed: f64) -> f64 {
    find_operating_point(fan, k, speed, &OperatingPointConfig::default()).airflow
}
