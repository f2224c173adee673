//! fg-core: stable foundation for fangait.
//!
//! Contains:
//! - units (uom SI types + airflow/pressure/power constructors)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FgError, FgResult};
pub use numeric::*;
pub use units::*;
