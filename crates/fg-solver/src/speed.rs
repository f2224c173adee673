//! Bisection on fan speed for a target operating airflow.

use crate::operating::{OperatingPointConfig, find_operating_point};
use fg_components::FanModel;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Default bisection iteration cap. 24 halvings of a 1500 rpm bracket
/// resolve speed to well under 0.001 rpm.
pub const DEFAULT_MAX_ITERATIONS: usize = 24;

/// Speed solver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedSolverConfig {
    /// Acceptance band around the target airflow (cfm)
    pub tolerance: f64,
    /// Maximum bisection iterations
    pub max_iterations: usize,
    /// Operating-point grid used at every trial speed
    pub grid: OperatingPointConfig,
}

impl Default for SpeedSolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 5.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            grid: OperatingPointConfig::default(),
        }
    }
}

/// How the speed solver terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedStatus {
    /// Target at or below what the lower bound delivers
    ClampedLow,
    /// Target at or above what the upper bound delivers
    ClampedHigh,
    /// A trial speed landed inside the tolerance band
    Converged,
    /// Iterations exhausted; midpoint of the final bracket
    MaxIterations,
}

/// Speed solver result.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedSolution {
    /// Commanded speed (rpm)
    pub speed: f64,
    /// Operating airflow at that speed (cfm)
    pub airflow: f64,
    /// Bisection iterations performed
    pub iterations: usize,
    pub status: SpeedStatus,
}

/// Find the lowest-effort speed in `[speed_lo, speed_hi]` that delivers
/// `target` airflow within `config.tolerance`.
///
/// The bounds are checked first: a target the lower bound already meets
/// returns the lower bound, a target the upper bound cannot exceed returns
/// the upper bound. Otherwise the bracket is bisected until a trial speed
/// lands inside `[target - tol, target + tol]` or iterations run out.
pub fn find_speed_for_target(
    fan: &dyn FanModel,
    k: f64,
    target: f64,
    speed_lo: f64,
    speed_hi: f64,
    config: &SpeedSolverConfig,
) -> SpeedSolution {
    let tol = config.tolerance;
    let airflow_at = |speed: f64| find_operating_point(fan, k, speed, &config.grid).airflow;

    let q_lo = airflow_at(speed_lo);
    if target <= q_lo + tol {
        return SpeedSolution {
            speed: speed_lo,
            airflow: q_lo,
            iterations: 0,
            status: SpeedStatus::ClampedLow,
        };
    }

    let q_hi = airflow_at(speed_hi);
    if target >= q_hi - tol {
        return SpeedSolution {
            speed: speed_hi,
            airflow: q_hi,
            iterations: 0,
            status: SpeedStatus::ClampedHigh,
        };
    }

    let mut lo = speed_lo;
    let mut hi = speed_hi;
    for iteration in 1..=config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let q_mid = airflow_at(mid);
        if q_mid < target - tol {
            lo = mid;
        } else if q_mid > target + tol {
            hi = mid;
        } else {
            return SpeedSolution {
                speed: mid,
                airflow: q_mid,
                iterations: iteration,
                status: SpeedStatus::Converged,
            };
        }
    }

    let speed = 0.5 * (lo + hi);
    let airflow = airflow_at(speed);
    trace!(
        target,
        speed,
        airflow,
        iterations = config.max_iterations,
        "speed bisection exhausted"
    );
    SpeedSolution {
        speed,
        airflow,
        iterations: config.max_iterations,
        status: SpeedStatus::MaxIterations,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use fg_components::FanCurve;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn solution_stays_within_bounds(
            k in 1e-5_f64..1e-3,
            target in 0.0_f64..1500.0,
            lo in 200.0_f64..900.0,
            span in 100.0_f64..1500.0,
        ) {
            let fan = FanCurve::from_bep(300.0, 120.0, 1200.0, 2.0).unwrap();
            let config = SpeedSolverConfig::default();
            let sol = find_speed_for_target(&fan, k, target, lo, lo + span, &config);
            prop_assert!(sol.speed >= lo && sol.speed <= lo + span);
            if sol.status == SpeedStatus::Converged {
                prop_assert!((sol.airflow - target).abs() <= config.tolerance);
            }
        }
    }
}
