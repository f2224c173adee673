//! Fan and system curve analysis at the mode speeds.
//!
//! Produces the numbers behind a fan/system curve chart: operating points
//! against the clean and fouled ducts, and electrical efficiency along each
//! speed's curve.

use fg_components::{FanModel, PowerModel};
use fg_core::{air_power, cfm, linspace, pa, to_l_per_s, to_watts};
use fg_solver::{OperatingPointConfig, find_operating_point};
use serde::{Deserialize, Serialize};

/// Default sweep resolution per speed.
pub const DEFAULT_SWEEP_POINTS: usize = 700;

/// Operating state at one speed against one duct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub airflow_cfm: f64,
    pub pressure_pa: f64,
    pub power_w: f64,
    /// Airflow in SI (L/s)
    pub airflow_l_s: f64,
    /// Aerodynamic output, airflow × pressure (W)
    pub air_power_w: f64,
    /// Air power over electrical power
    pub total_efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPointRow {
    pub speed_rpm: f64,
    pub clean: CurvePoint,
    pub fouled: CurvePoint,
}

fn curve_point(fan: &dyn FanModel, power: &dyn PowerModel, k: f64, speed: f64, grid: &OperatingPointConfig) -> CurvePoint {
    let op = find_operating_point(fan, k, speed, grid);
    let power_w = power.power_at(fan, op.airflow, speed);
    let air_power_w = to_watts(air_power(cfm(op.airflow), pa(op.pressure)));
    CurvePoint {
        airflow_cfm: op.airflow,
        pressure_pa: op.pressure,
        power_w,
        airflow_l_s: to_l_per_s(cfm(op.airflow)),
        air_power_w,
        total_efficiency: if power_w > 0.0 { air_power_w / power_w } else { 0.0 },
    }
}

/// Operating points for every speed against the clean and fouled ducts.
pub fn operating_point_table(
    fan: &dyn FanModel,
    power: &dyn PowerModel,
    speeds_rpm: &[f64],
    k_clean: f64,
    k_fouled: f64,
    grid: &OperatingPointConfig,
) -> Vec<OperatingPointRow> {
    speeds_rpm
        .iter()
        .map(|&speed| OperatingPointRow {
            speed_rpm: speed,
            clean: curve_point(fan, power, k_clean, speed, grid),
            fouled: curve_point(fan, power, k_fouled, speed, grid),
        })
        .collect()
}

/// Airflow per watt along one speed's fan curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencySweep {
    pub speed_rpm: f64,
    /// `(airflow cfm, cfm/W)` samples where the fan still builds pressure
    pub points: Vec<(f64, f64)>,
    /// Highest-efficiency sample, if any
    pub peak: Option<(f64, f64)>,
}

/// Sweep `[q_min_frac, q_max_frac]` of free delivery at `speed`.
///
/// Samples with no pressure rise or no electrical power are dropped. The
/// peak keeps the first sample on exact ties.
pub fn efficiency_sweep(
    fan: &dyn FanModel,
    power: &dyn PowerModel,
    speed: f64,
    q_min_frac: f64,
    q_max_frac: f64,
    points: usize,
) -> EfficiencySweep {
    let q_free = fan.free_delivery(speed);
    let q_lo = (q_min_frac * q_free).max(1e-6);
    let q_hi = q_max_frac * q_free;

    let samples: Vec<(f64, f64)> = linspace(q_lo, q_hi, points)
        .into_iter()
        .filter_map(|q| {
            let p = power.power_at(fan, q, speed);
            (fan.pressure_at(q, speed) > 0.0 && p > 0.0).then_some((q, q / p))
        })
        .collect();

    let peak = samples.iter().copied().fold(None, |best: Option<(f64, f64)>, s| match best {
        Some(b) if b.1 >= s.1 => Some(b),
        _ => Some(s),
    });

    EfficiencySweep {
        speed_rpm: speed,
        points: samples,
        peak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_components::{ConvexPowerModel, FanCurve, PowerShape};

    fn models() -> (FanCurve, ConvexPowerModel) {
        (
            FanCurve::from_bep(300.0, 120.0, 1200.0, 2.0).unwrap(),
            ConvexPowerModel::new(40.0, 1200.0, PowerShape::default()).unwrap(),
        )
    }

    #[test]
    fn table_has_one_row_per_speed() {
        let (fan, power) = models();
        let speeds = [700.0, 800.0, 900.0, 1000.0];
        let rows = operating_point_table(&fan, &power, &speeds, 6e-5, 4e-4, &OperatingPointConfig::default());
        assert_eq!(rows.len(), 4);
        for row in &rows {
            assert!(row.fouled.airflow_cfm < row.clean.airflow_cfm);
            assert!(row.fouled.pressure_pa > row.clean.pressure_pa);
            assert!(row.clean.total_efficiency > 0.0 && row.clean.total_efficiency < 1.0);
        }
        assert!(rows.windows(2).all(|w| w[0].clean.power_w < w[1].clean.power_w));
    }

    #[test]
    fn si_columns_match_catalog_units() {
        let (fan, power) = models();
        let rows = operating_point_table(&fan, &power, &[900.0], 6e-5, 4e-4, &OperatingPointConfig::default());
        let p = rows[0].clean;
        assert!((p.airflow_l_s - p.airflow_cfm * 0.471_947).abs() < 1e-3);
        // 1 cfm·Pa = 4.719e-4 W
        assert!((p.air_power_w - p.airflow_cfm * p.pressure_pa * 4.719_474e-4).abs() < 1e-4);
    }

    #[test]
    fn efficiency_peak_inside_sweep() {
        let (fan, power) = models();
        let sweep = efficiency_sweep(&fan, &power, 1200.0, 0.01, 0.99, DEFAULT_SWEEP_POINTS);
        assert_eq!(sweep.points.len(), DEFAULT_SWEEP_POINTS);
        let (q, eff) = sweep.peak.unwrap();
        assert!(sweep.points.iter().all(|&(_, e)| e <= eff));
        // x/p(x) peaks at sqrt(p0/b2) of free delivery, ~0.43 for the default shape
        let x = q / fan.free_delivery(1200.0);
        assert!((x - (0.22_f64 / 1.2).sqrt()).abs() < 0.01);
    }

    #[test]
    fn zero_speed_sweep_is_empty() {
        let (fan, power) = models();
        let sweep = efficiency_sweep(&fan, &power, 0.0, 0.01, 0.99, 50);
        assert!(sweep.points.is_empty());
        assert!(sweep.peak.is_none());
    }
}
