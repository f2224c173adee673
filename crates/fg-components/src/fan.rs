//! Fan pressure/flow curve with affinity-law scaling.

use crate::common::{EPSILON, MAX_NORMALIZED_FLOW, check_non_negative, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::FanModel;
use serde::{Deserialize, Serialize};

/// Catalog heuristic: the best-efficiency point sits near 60% of free
/// delivery and 60% of shutoff pressure.
pub const BEP_CURVE_FRACTION: f64 = 0.6;

/// Reference fan curve, monotone decreasing and clipped at free delivery.
///
/// ## Model
///
/// At the reference speed `N_ref`:
///
/// ```text
/// Δp_ref(Q) = Δp_shut · max(1 − (Q / Q_free)^n, 0)
/// ```
///
/// Affinity scaling to any speed `N`:
///
/// ```text
/// Q_free(N)  = Q_free  · (N / N_ref)
/// Δp_shut(N) = Δp_shut · (N / N_ref)²
/// ```
///
/// `n ≥ 2` gives the convex-to-origin falloff of a real fan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FanCurve {
    /// Free-delivery airflow at the reference speed (cfm)
    pub free_delivery_ref_cfm: f64,
    /// Shutoff pressure at the reference speed (Pa)
    pub shutoff_pressure_ref_pa: f64,
    /// Reference speed (rpm)
    pub reference_speed_rpm: f64,
    /// Shape exponent `n` (≥ 2)
    pub shape_exponent: f64,
}

impl FanCurve {
    /// Create a fan curve from raw reference values.
    ///
    /// # Errors
    /// Returns error if a value is non-finite, negative, the reference speed
    /// is not positive, or the shape exponent is below 2.
    pub fn new(
        free_delivery_ref_cfm: f64,
        shutoff_pressure_ref_pa: f64,
        reference_speed_rpm: f64,
        shape_exponent: f64,
    ) -> ComponentResult<Self> {
        check_non_negative(free_delivery_ref_cfm, "free delivery must be non-negative")?;
        check_non_negative(shutoff_pressure_ref_pa, "shutoff pressure must be non-negative")?;
        check_positive(reference_speed_rpm, "reference speed must be positive")?;
        if !shape_exponent.is_finite() || shape_exponent < 2.0 {
            return Err(ComponentError::InvalidArg {
                what: "shape exponent must be a finite value >= 2",
            });
        }

        Ok(Self {
            free_delivery_ref_cfm,
            shutoff_pressure_ref_pa,
            reference_speed_rpm,
            shape_exponent,
        })
    }

    /// Build the reference curve from a best-efficiency point.
    ///
    /// `Q_free = Q_bep / 0.6` and `Δp_shut = Δp_bep / 0.6`.
    pub fn from_bep(
        bep_airflow_cfm: f64,
        bep_pressure_pa: f64,
        reference_speed_rpm: f64,
        shape_exponent: f64,
    ) -> ComponentResult<Self> {
        Self::new(
            bep_airflow_cfm / BEP_CURVE_FRACTION,
            bep_pressure_pa / BEP_CURVE_FRACTION,
            reference_speed_rpm,
            shape_exponent,
        )
    }

    /// Speed ratio `N / N_ref`.
    #[inline]
    pub fn speed_ratio(&self, speed: f64) -> f64 {
        speed / self.reference_speed_rpm
    }
}

impl FanModel for FanCurve {
    fn free_delivery(&self, speed: f64) -> f64 {
        self.free_delivery_ref_cfm * self.speed_ratio(speed)
    }

    fn shutoff_pressure(&self, speed: f64) -> f64 {
        let ratio = self.speed_ratio(speed);
        self.shutoff_pressure_ref_pa * ratio * ratio
    }

    fn pressure_at(&self, airflow: f64, speed: f64) -> f64 {
        let q_free = self.free_delivery(speed);
        let x = (airflow / q_free.max(EPSILON)).clamp(0.0, MAX_NORMALIZED_FLOW);
        let dp = self.shutoff_pressure(speed) * (1.0 - x.powf(self.shape_exponent)).max(0.0);
        // shutoff pressure is non-negative for any real speed; guard the sign anyway
        dp.max(0.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pressure_bounded_by_shutoff(q in -1e4_f64..1e4, n in 0.0_f64..3000.0, shape in 2.0_f64..4.0) {
            let fan = FanCurve::from_bep(300.0, 120.0, 1200.0, shape).unwrap();
            let dp = fan.pressure_at(q, n);
            prop_assert!(dp >= 0.0);
            prop_assert!(dp <= fan.shutoff_pressure(n) + 1e-9);
        }

        #[test]
        fn pressure_decreases_with_flow(q in 0.0_f64..600.0, dq in 0.0_f64..100.0, n in 100.0_f64..2000.0) {
            let fan = FanCurve::from_bep(300.0, 120.0, 1200.0, 2.0).unwrap();
            prop_assert!(fan.pressure_at(q + dq, n) <= fan.pressure_at(q, n) + 1e-12);
        }
    }
}
