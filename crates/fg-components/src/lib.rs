//! fg-components: fan and duct models.
//!
//! Provides the quasi-static building blocks of a fan/duct study:
//! - `FanCurve`: clipped power-law pressure/flow curve with affinity scaling
//! - `SystemResistance`: quadratic duct resistance `Δp = k·Q²`
//! - `ConvexPowerModel`: electrical power vs (airflow, speed), calibrated at BEP
//!
//! Evaluation is infallible and deterministic; only constructors validate.
//! Units follow fan catalogs: airflow in cfm, pressure in Pa, speed in rpm,
//! power in W.
//!
//! # Example
//!
//! ```
//! use fg_components::{FanCurve, FanModel, SystemResistance};
//!
//! let fan = FanCurve::from_bep(300.0, 120.0, 1200.0, 2.0).unwrap();
//! let duct = SystemResistance::new(6e-5).unwrap();
//!
//! assert!((fan.free_delivery(1200.0) - 500.0).abs() < 1e-9);
//! assert!(fan.pressure_at(250.0, 900.0) > duct.pressure_drop(250.0));
//! ```

pub mod common;
pub mod error;
pub mod fan;
pub mod power;
pub mod resistance;
pub mod traits;

// Re-exports
pub use error::{ComponentError, ComponentResult};
pub use fan::FanCurve;
pub use power::{ConvexPowerModel, PowerCoefficients, PowerShape, power_at};
pub use resistance::SystemResistance;
pub use traits::{FanModel, PowerModel};
