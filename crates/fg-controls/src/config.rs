//! Strategy configuration.

use crate::error::{ControlError, ControlResult};
use fg_solver::{DEFAULT_GRID_POINTS, DEFAULT_MAX_ITERATIONS, OperatingPointConfig, SpeedSolverConfig};
use serde::{Deserialize, Serialize};

/// Settings shared by the three strategies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Speed of the fixed strategy (rpm)
    pub fixed_speed_rpm: f64,
    /// Allowed speeds of the mode-switch strategy, in tie-break order (rpm)
    pub mode_speeds_rpm: Vec<f64>,
    /// Lower and upper speed bounds of the variable strategy (rpm)
    pub speed_bounds_rpm: (f64, f64),
    /// Demand tolerance band (cfm)
    pub tolerance_cfm: f64,
    /// Bisection iteration cap of the variable strategy
    pub max_bisection_iterations: usize,
    /// Weight of shortfall (per cfm·h) in the objective
    pub shortfall_penalty: f64,
    /// Operating-point grid resolution
    pub grid_points: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            fixed_speed_rpm: 900.0,
            mode_speeds_rpm: vec![700.0, 800.0, 900.0, 1000.0],
            speed_bounds_rpm: (500.0, 2000.0),
            tolerance_cfm: 5.0,
            max_bisection_iterations: DEFAULT_MAX_ITERATIONS,
            shortfall_penalty: 0.4,
            grid_points: DEFAULT_GRID_POINTS,
        }
    }
}

impl StrategyConfig {
    /// Check every setting.
    ///
    /// # Errors
    /// Returns the first offending setting.
    pub fn validate(&self) -> ControlResult<()> {
        check_speed(self.fixed_speed_rpm, "fixed speed")?;

        if self.mode_speeds_rpm.is_empty() {
            return Err(ControlError::InvalidArg {
                what: "mode-switch needs at least one speed",
            });
        }
        for &speed in &self.mode_speeds_rpm {
            check_speed(speed, "mode speed")?;
        }

        let (lo, hi) = self.speed_bounds_rpm;
        check_speed(lo, "lower speed bound")?;
        check_speed(hi, "upper speed bound")?;
        if lo > hi {
            return Err(ControlError::InvertedBounds { lo, hi });
        }

        if !self.tolerance_cfm.is_finite() || self.tolerance_cfm < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "tolerance must be finite and non-negative",
            });
        }
        if self.max_bisection_iterations == 0 {
            return Err(ControlError::InvalidArg {
                what: "bisection needs at least one iteration",
            });
        }
        if !self.shortfall_penalty.is_finite() || self.shortfall_penalty < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "shortfall penalty must be finite and non-negative",
            });
        }
        if self.grid_points < 2 {
            return Err(ControlError::InvalidArg {
                what: "operating-point grid needs at least 2 points",
            });
        }
        Ok(())
    }

    pub fn grid(&self) -> OperatingPointConfig {
        OperatingPointConfig {
            grid_points: self.grid_points,
        }
    }

    pub fn speed_solver(&self) -> SpeedSolverConfig {
        SpeedSolverConfig {
            tolerance: self.tolerance_cfm,
            max_iterations: self.max_bisection_iterations,
            grid: self.grid(),
        }
    }
}

fn check_speed(value: f64, what: &'static str) -> ControlResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ControlError::InvalidSpeed { what, value })
    }
}
