//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use fg_core::numeric::ensure_finite;

pub use fg_core::numeric::EPSILON;

/// Upper clamp on normalized flow in the fan curve. Far past free delivery
/// the curve is already clipped to zero; the cap keeps `x^n` finite.
pub const MAX_NORMALIZED_FLOW: f64 = 10.0;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a value is finite and not negative.
pub fn check_non_negative(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value < 0.0 {
        return Err(ComponentError::NonPhysical { what });
    }
    Ok(())
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<()> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(ComponentError::NonPhysical { what });
    }
    Ok(())
}
