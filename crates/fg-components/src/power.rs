//! Electrical power model calibrated at the best-efficiency point.

use crate::common::{EPSILON, check_finite, check_non_negative, check_positive};
use crate::error::ComponentResult;
use crate::traits::{FanModel, PowerModel};
use serde::{Deserialize, Serialize};

/// Shape parameters of the normalized power curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerShape {
    /// Power at zero flow as a fraction of BEP power (`p0`)
    pub idle_fraction: f64,
    /// Power at free delivery as a fraction of BEP power (`γ`)
    pub free_delivery_ratio: f64,
    /// Normalized flow `Q / Q_free` at which the BEP sits (`x_bep`)
    pub bep_flow_fraction: f64,
}

impl Default for PowerShape {
    fn default() -> Self {
        Self {
            idle_fraction: 0.22,
            free_delivery_ratio: 2.0,
            bep_flow_fraction: 0.6,
        }
    }
}

/// Coefficients of `p(x) = p0 + b1·x + b2·x²`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerCoefficients {
    pub p0: f64,
    pub b1: f64,
    pub b2: f64,
    /// Set when the calibrated curve was non-physical and the fixed
    /// curvature fallback was applied instead.
    pub fallback: bool,
}

impl PowerCoefficients {
    /// Calibrate so that `p(x_bep) = 1` and `p(1) = γ` with `p(0) = p0`.
    ///
    /// A calibrated curve with non-positive curvature or a non-increasing
    /// slope at free delivery is replaced by `b2 = max(0.2·(γ − 1), 1e-3)`
    /// with `b1` recomputed from the free-delivery constraint.
    pub fn calibrate(shape: &PowerShape) -> Self {
        let p0 = shape.idle_fraction;
        let gamma = shape.free_delivery_ratio;
        let x_bep = shape.bep_flow_fraction;

        let raw_denom = x_bep * x_bep - x_bep;
        let denom = if raw_denom.abs() > EPSILON {
            raw_denom
        } else {
            -1e-3
        };
        let b2 = (1.0 - p0 - x_bep * (gamma - p0)) / denom;
        let b1 = (gamma - p0) - b2;

        if b2 <= 0.0 || (b1 + 2.0 * b2) <= 0.0 {
            let b2 = (0.2 * (gamma - 1.0)).max(1e-3);
            return Self {
                p0,
                b1: (gamma - p0) - b2,
                b2,
                fallback: true,
            };
        }

        Self {
            p0,
            b1,
            b2,
            fallback: false,
        }
    }

    /// Evaluate the normalized curve at `x`.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.p0 + self.b1 * x + self.b2 * x * x
    }
}

/// Convex electrical power model scaled by the affinity law for power.
///
/// ## Model
///
/// ```text
/// x      = clamp(Q / Q_free(N), 0, 1)
/// P(Q,N) = P_bep · (N / N_ref)³ · (p0 + b1·x + b2·x²)
/// ```
///
/// The coefficients are calibrated once at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPowerModel {
    /// Electrical power at BEP and reference speed (W)
    pub bep_power_w: f64,
    /// Reference speed for the cubic scaling (rpm)
    pub reference_speed_rpm: f64,
    /// Curve shape parameters
    pub shape: PowerShape,
    coefficients: PowerCoefficients,
}

impl ConvexPowerModel {
    /// Create a power model.
    ///
    /// # Errors
    /// Returns error if BEP power is negative, the reference speed is not
    /// positive, or a shape parameter is non-finite.
    pub fn new(bep_power_w: f64, reference_speed_rpm: f64, shape: PowerShape) -> ComponentResult<Self> {
        check_non_negative(bep_power_w, "BEP power must be non-negative")?;
        check_positive(reference_speed_rpm, "reference speed must be positive")?;
        check_finite(shape.idle_fraction, "idle fraction")?;
        check_finite(shape.free_delivery_ratio, "free-delivery power ratio")?;
        check_finite(shape.bep_flow_fraction, "BEP flow fraction")?;

        Ok(Self {
            bep_power_w,
            reference_speed_rpm,
            shape,
            coefficients: PowerCoefficients::calibrate(&shape),
        })
    }

    pub fn coefficients(&self) -> &PowerCoefficients {
        &self.coefficients
    }

    /// BEP power scaled to `speed` by the cube law.
    #[inline]
    pub fn bep_power_at_speed(&self, speed: f64) -> f64 {
        self.bep_power_w * (speed / self.reference_speed_rpm).powi(3)
    }
}

impl PowerModel for ConvexPowerModel {
    fn power_at(&self, fan: &dyn FanModel, airflow: f64, speed: f64) -> f64 {
        let q_free = fan.free_delivery(speed).max(EPSILON);
        let x = (airflow / q_free).clamp(0.0, 1.0);
        (self.bep_power_at_speed(speed) * self.coefficients.eval(x)).max(0.0)
    }
}

/// One-shot power evaluation without building a model.
///
/// Equivalent to `ConvexPowerModel::power_at` with the given parameters; the
/// calibration runs on every call.
#[allow(clippy::too_many_arguments)]
pub fn power_at(
    fan: &dyn FanModel,
    airflow: f64,
    speed: f64,
    bep_power_w: f64,
    reference_speed_rpm: f64,
    idle_fraction: f64,
    free_delivery_ratio: f64,
    bep_flow_fraction: f64,
) -> f64 {
    let coefficients = PowerCoefficients::calibrate(&PowerShape {
        idle_fraction,
        free_delivery_ratio,
        bep_flow_fraction,
    });
    let q_free = fan.free_delivery(speed).max(EPSILON);
    let x = (airflow / q_free).clamp(0.0, 1.0);
    let p_ref = bep_power_w * (speed / reference_speed_rpm).powi(3);
    (p_ref * coefficients.eval(x)).max(0.0)
}
