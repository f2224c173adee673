//! Core traits for fan and power models.
//!
//! The solvers and strategies only see these traits, so alternative fan
//! curves (tabulated catalog data, test doubles) and power functions can be
//! swapped in without touching the control logic.

/// Pressure/flow characteristic of a fan across its speed range.
///
/// Implementations must be pure: the same `(airflow, speed)` always yields
/// the same pressure. `Send + Sync` lets a simulation evaluate timesteps in
/// parallel against a shared model.
pub trait FanModel: Send + Sync {
    /// Airflow (cfm) at zero static pressure for the given speed (rpm).
    fn free_delivery(&self, speed: f64) -> f64;

    /// Static pressure (Pa) at zero airflow for the given speed (rpm).
    fn shutoff_pressure(&self, speed: f64) -> f64;

    /// Static pressure rise (Pa) at `airflow` (cfm) and `speed` (rpm).
    ///
    /// Never negative, whatever the input magnitude.
    fn pressure_at(&self, airflow: f64, speed: f64) -> f64;
}

/// Electrical power draw of a fan at an operating point.
pub trait PowerModel: Send + Sync {
    /// Power (W) drawn by `fan` moving `airflow` (cfm) at `speed` (rpm).
    fn power_at(&self, fan: &dyn FanModel, airflow: f64, speed: f64) -> f64;
}
