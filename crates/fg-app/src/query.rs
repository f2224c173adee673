//! Query helpers for extracting series from loaded runs.

use fg_controls::StrategyKind;
use fg_sim::{SimulationFrame, StrategyStep};

use crate::error::{AppError, AppResult};

/// Summary of a run's time range and size.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub frame_count: usize,
    pub demand_range: (f64, f64),
    pub resistance_range: (f64, f64),
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

pub fn get_run_summary(frames: &[SimulationFrame]) -> AppResult<RunSummary> {
    let (first, last) = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::InvalidInput("No frames in run".to_string())),
    };

    Ok(RunSummary {
        time_range: (first.time, last.time),
        frame_count: frames.len(),
        demand_range: min_max(frames.iter().map(|f| f.demand)),
        resistance_range: min_max(frames.iter().map(|f| f.resistance)),
    })
}

/// Variables recorded per strategy.
pub const STRATEGY_VARIABLES: [&str; 6] = [
    "airflow",
    "speed",
    "power",
    "shortfall",
    "oversupply",
    "compliant",
];

/// Variables shared by all strategies.
pub const FRAME_VARIABLES: [&str; 2] = ["demand", "resistance"];

fn strategy_value(step: &StrategyStep, variable: &str) -> AppResult<f64> {
    let value = match variable {
        "airflow" | "airflow_cfm" => step.airflow,
        "speed" | "speed_rpm" => step.speed,
        "power" | "power_w" => step.power,
        "shortfall" | "shortfall_cfm" => step.shortfall,
        "oversupply" | "oversupply_cfm" => step.oversupply,
        "compliant" => {
            if step.compliant {
                1.0
            } else {
                0.0
            }
        }
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Unknown strategy variable: {variable}"
            )));
        }
    };
    Ok(value)
}

/// Extract a (time, value) series for one strategy variable.
///
/// `compliant` is reported as 1.0 / 0.0.
pub fn extract_strategy_series(
    frames: &[SimulationFrame],
    kind: StrategyKind,
    variable: &str,
) -> AppResult<Vec<(f64, f64)>> {
    frames
        .iter()
        .map(|f| Ok((f.time, strategy_value(f.step(kind), variable)?)))
        .collect()
}

/// Extract a (time, value) series for a frame input variable.
pub fn extract_frame_series(
    frames: &[SimulationFrame],
    variable: &str,
) -> AppResult<Vec<(f64, f64)>> {
    let pick: fn(&SimulationFrame) -> f64 = match variable {
        "demand" | "demand_cfm" => |f| f.demand,
        "resistance" | "k" => |f| f.resistance,
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Unknown frame variable: {variable}"
            )));
        }
    };
    Ok(frames.iter().map(|f| (f.time, pick(f))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(airflow: f64, compliant: bool) -> StrategyStep {
        StrategyStep {
            speed: 900.0,
            airflow,
            power: 30.0,
            compliant,
            shortfall: 0.0,
            oversupply: 0.0,
        }
    }

    fn frames() -> Vec<SimulationFrame> {
        vec![
            SimulationFrame {
                time: 0.0,
                demand: 300.0,
                resistance: 6e-5,
                strategies: [step(360.0, false), step(330.0, false), step(300.0, true)],
            },
            SimulationFrame {
                time: 60.0,
                demand: 280.0,
                resistance: 1e-4,
                strategies: [step(350.0, false), step(282.0, true), step(281.0, true)],
            },
        ]
    }

    #[test]
    fn summary_of_frames() {
        let summary = get_run_summary(&frames()).unwrap();
        assert_eq!(summary.time_range, (0.0, 60.0));
        assert_eq!(summary.frame_count, 2);
        assert_eq!(summary.demand_range, (280.0, 300.0));
        assert_eq!(summary.resistance_range, (6e-5, 1e-4));
    }

    #[test]
    fn summary_rejects_empty_run() {
        assert!(get_run_summary(&[]).is_err());
    }

    #[test]
    fn strategy_series_by_kind() {
        let frames = frames();
        let series = extract_strategy_series(&frames, StrategyKind::ModeSwitch, "airflow").unwrap();
        assert_eq!(series, vec![(0.0, 330.0), (60.0, 282.0)]);
        let compliant = extract_strategy_series(&frames, StrategyKind::Fixed, "compliant").unwrap();
        assert_eq!(compliant, vec![(0.0, 0.0), (60.0, 0.0)]);
    }

    #[test]
    fn every_listed_variable_resolves() {
        let frames = frames();
        for var in STRATEGY_VARIABLES {
            assert!(extract_strategy_series(&frames, StrategyKind::Variable, var).is_ok());
        }
        for var in FRAME_VARIABLES {
            assert!(extract_frame_series(&frames, var).is_ok());
        }
    }

    #[test]
    fn unknown_variable_is_rejected() {
        let frames = frames();
        assert!(extract_strategy_series(&frames, StrategyKind::Fixed, "enthalpy").is_err());
        assert!(extract_frame_series(&frames, "airflow").is_err());
    }
}
