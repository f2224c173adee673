//! Demand and fouling profiles.
//!
//! ## Model
//!
//! ```text
//! t_i     = i·dt                               for t_i ≤ horizon
//! Q_d(t)  = base + amplitude·sin(2πt / horizon)
//! k(t)    = k_clean                            t < t0
//!         = k_clean + (k_fouled − k_clean)·(t − t0)/max(t1 − t0, 1e-9)
//!                                              t0 ≤ t ≤ t1
//!         = k_fouled                           t > t1
//! t0, t1  = start·horizon, end·horizon
//! ```

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use fg_core::EPSILON;
use fg_project::schema::{DemandDef, Project};
use tracing::debug;

use crate::error::{AppError, AppResult};

const TIME_COLUMN: &str = "time_s";
const DEMAND_COLUMN: &str = "airflow_demand_cfm";

/// Input series for one simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Profiles {
    pub time: Vec<f64>,
    pub demand: Vec<f64>,
    pub resistance: Vec<f64>,
}

/// Linear fouling ramp between two fractions of the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoulingRamp {
    pub k_clean: f64,
    pub k_fouled: f64,
    /// Ramp start (s)
    pub start_s: f64,
    /// Ramp end (s)
    pub end_s: f64,
}

impl FoulingRamp {
    pub fn over_horizon(
        horizon_s: f64,
        start_fraction: f64,
        end_fraction: f64,
        k_clean: f64,
        k_fouled: f64,
    ) -> Self {
        Self {
            k_clean,
            k_fouled,
            start_s: start_fraction * horizon_s,
            end_s: end_fraction * horizon_s,
        }
    }

    pub fn at(&self, t: f64) -> f64 {
        if t < self.start_s {
            self.k_clean
        } else if t > self.end_s {
            self.k_fouled
        } else {
            let span = (self.end_s - self.start_s).max(EPSILON);
            self.k_clean + (self.k_fouled - self.k_clean) * (t - self.start_s) / span
        }
    }
}

/// Sinusoidal demand with a fouling ramp over `[0, horizon]`.
#[allow(clippy::too_many_arguments)]
pub fn build_profiles(
    horizon_s: f64,
    dt_s: f64,
    base_cfm: f64,
    amplitude_cfm: f64,
    foul_start: f64,
    foul_end: f64,
    k_clean: f64,
    k_fouled: f64,
) -> Profiles {
    let count = ((horizon_s + EPSILON) / dt_s).ceil().max(0.0) as usize;
    let time: Vec<f64> = (0..count).map(|i| i as f64 * dt_s).collect();
    let demand = time
        .iter()
        .map(|&t| base_cfm + amplitude_cfm * (2.0 * PI * t / horizon_s).sin())
        .collect();
    let ramp = FoulingRamp::over_horizon(horizon_s, foul_start, foul_end, k_clean, k_fouled);
    let resistance = time.iter().map(|&t| ramp.at(t)).collect();
    Profiles {
        time,
        demand,
        resistance,
    }
}

/// Parsed demand CSV, sorted by time.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandSeries {
    pub time: Vec<f64>,
    pub demand: Vec<f64>,
}

/// Read a demand CSV with `time_s` and `airflow_demand_cfm` columns.
pub fn load_demand_csv(path: &Path) -> AppResult<DemandSeries> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_demand_csv(&content, path)
}

/// Parse demand CSV text. `path` is only used in error messages.
///
/// The header is required; columns may appear in any order and extra
/// columns are ignored. Blank lines are skipped. Rows are stably sorted
/// by time.
pub fn parse_demand_csv(content: &str, path: &Path) -> AppResult<DemandSeries> {
    let csv_error = |line: usize, message: String| AppError::Csv {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| csv_error(1, "file is empty".to_string()))?;
    let columns: Vec<&str> = header
        .split(',')
        .map(|c| c.trim().trim_matches('"').trim_start_matches('\u{feff}'))
        .collect();
    let find = |name: &str| columns.iter().position(|c| *c == name);
    let (time_idx, demand_idx) = match (find(TIME_COLUMN), find(DEMAND_COLUMN)) {
        (Some(t), Some(d)) => (t, d),
        _ => {
            return Err(csv_error(
                header_line,
                format!("CSV must have columns: {TIME_COLUMN}, {DEMAND_COLUMN}"),
            ));
        }
    };

    let mut rows: Vec<(f64, f64)> = Vec::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |idx: usize, name: &str| -> AppResult<f64> {
            let raw = fields
                .get(idx)
                .ok_or_else(|| csv_error(line_no, format!("missing {name}")))?;
            let value: f64 = raw
                .trim_matches('"')
                .parse()
                .map_err(|_| csv_error(line_no, format!("{name} is not a number: '{raw}'")))?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(csv_error(line_no, format!("{name} is not finite")))
            }
        };
        rows.push((field(time_idx, TIME_COLUMN)?, field(demand_idx, DEMAND_COLUMN)?));
    }

    if rows.is_empty() {
        return Err(csv_error(header_line, "no data rows".to_string()));
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (time, demand) = rows.into_iter().unzip();
    Ok(DemandSeries { time, demand })
}

/// Profiles for a project, plus the raw CSV text when demand comes from a
/// file (it takes part in the run id).
///
/// CSV demand gets the fouling ramp laid over the CSV's own time span.
pub fn profiles_for_project(
    project: &Project,
    project_dir: &Path,
) -> AppResult<(Profiles, Option<String>)> {
    let system = &project.system;
    let fouling = &project.fouling;

    match &project.demand {
        DemandDef::Sinusoid {
            base_cfm,
            amplitude_cfm,
        } => {
            let profiles = build_profiles(
                project.simulation.horizon_s,
                project.simulation.dt_s,
                *base_cfm,
                *amplitude_cfm,
                fouling.start_fraction,
                fouling.end_fraction,
                system.k_clean,
                system.k_fouled,
            );
            debug!(steps = profiles.time.len(), "built sinusoidal demand profile");
            Ok((profiles, None))
        }
        DemandDef::Csv { path } => {
            let csv_path = resolve(project_dir, path);
            let content = std::fs::read_to_string(&csv_path).map_err(|source| AppError::FileRead {
                path: csv_path.clone(),
                source,
            })?;
            let series = parse_demand_csv(&content, &csv_path)?;

            let t_first = series.time[0];
            let t_last = series.time[series.time.len() - 1];
            let ramp = FoulingRamp::over_horizon(
                t_last - t_first,
                fouling.start_fraction,
                fouling.end_fraction,
                system.k_clean,
                system.k_fouled,
            );
            let resistance = series.time.iter().map(|&t| ramp.at(t - t_first)).collect();
            debug!(
                steps = series.time.len(),
                path = %csv_path.display(),
                "loaded demand CSV"
            );
            Ok((
                Profiles {
                    time: series.time,
                    demand: series.demand,
                    resistance,
                },
                Some(content),
            ))
        }
    }
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_path() -> &'static Path {
        Path::new("demand.csv")
    }

    #[test]
    fn profile_includes_horizon_endpoint() {
        let p = build_profiles(3600.0, 1.0, 300.0, 75.0, 0.15, 0.85, 6e-5, 4e-4);
        assert_eq!(p.time.len(), 3601);
        assert_eq!(p.time[3600], 3600.0);
        assert_eq!(p.demand.len(), 3601);
        assert_eq!(p.resistance.len(), 3601);
    }

    #[test]
    fn profile_with_uneven_step_stops_before_horizon() {
        let p = build_profiles(10.0, 3.0, 300.0, 0.0, 0.0, 1.0, 1e-4, 1e-4);
        assert_eq!(p.time, vec![0.0, 3.0, 6.0, 9.0]);
    }

    #[test]
    fn demand_follows_one_sine_period() {
        let p = build_profiles(3600.0, 900.0, 300.0, 75.0, 0.15, 0.85, 6e-5, 4e-4);
        assert_eq!(p.demand[0], 300.0);
        assert!((p.demand[1] - 375.0).abs() < 1e-9);
        assert!((p.demand[3] - 225.0).abs() < 1e-9);
    }

    #[test]
    fn fouling_ramp_shape() {
        let ramp = FoulingRamp::over_horizon(3600.0, 0.15, 0.85, 6e-5, 4e-4);
        assert_eq!(ramp.at(0.0), 6e-5);
        assert_eq!(ramp.at(539.0), 6e-5);
        assert_eq!(ramp.at(540.0), 6e-5);
        assert!((ramp.at(1800.0) - 2.3e-4).abs() < 1e-12);
        assert!((ramp.at(3060.0) - 4e-4).abs() < 1e-15);
        assert_eq!(ramp.at(3061.0), 4e-4);
    }

    #[test]
    fn instant_fouling_step() {
        let ramp = FoulingRamp::over_horizon(100.0, 0.5, 0.5, 1e-4, 3e-4);
        assert_eq!(ramp.at(49.0), 1e-4);
        assert_eq!(ramp.at(50.0), 1e-4);
        assert_eq!(ramp.at(51.0), 3e-4);
    }

    #[test]
    fn parse_csv_any_column_order() {
        let text = "zone,airflow_demand_cfm,time_s\nA,310,60\nA,300,0\n\nA,320.5,120\n";
        let series = parse_demand_csv(text, csv_path()).unwrap();
        assert_eq!(series.time, vec![0.0, 60.0, 120.0]);
        assert_eq!(series.demand, vec![300.0, 310.0, 320.5]);
    }

    #[test]
    fn parse_csv_requires_columns() {
        let err = parse_demand_csv("t,q\n0,300\n", csv_path()).unwrap_err();
        assert!(matches!(err, AppError::Csv { line: 1, .. }));
        assert!(err.to_string().contains("time_s"));
    }

    #[test]
    fn parse_csv_reports_bad_value_line() {
        let text = "time_s,airflow_demand_cfm\n0,300\n1,abc\n";
        let err = parse_demand_csv(text, csv_path()).unwrap_err();
        assert!(matches!(err, AppError::Csv { line: 3, .. }));
    }

    #[test]
    fn parse_csv_rejects_short_rows_and_empty_files() {
        let err = parse_demand_csv("time_s,airflow_demand_cfm\n0\n", csv_path()).unwrap_err();
        assert!(matches!(err, AppError::Csv { line: 2, .. }));
        assert!(parse_demand_csv("", csv_path()).is_err());
        assert!(parse_demand_csv("time_s,airflow_demand_cfm\n", csv_path()).is_err());
    }

    #[test]
    fn project_csv_demand_uses_csv_time_span() {
        let dir = std::env::temp_dir().join(format!(
            "fg_app_profiles_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("demand.csv"),
            "time_s,airflow_demand_cfm\n100,300\n150,310\n200,320\n",
        )
        .unwrap();

        let mut project = Project::demo();
        project.demand = DemandDef::Csv {
            path: "demand.csv".to_string(),
        };
        project.fouling.start_fraction = 0.0;
        project.fouling.end_fraction = 1.0;

        let (profiles, raw) = profiles_for_project(&project, &dir).unwrap();
        assert!(raw.is_some());
        assert_eq!(profiles.time, vec![100.0, 150.0, 200.0]);
        assert_eq!(profiles.resistance[0], project.system.k_clean);
        assert!((profiles.resistance[2] - project.system.k_fouled).abs() < 1e-15);

        let _ = std::fs::remove_dir_all(dir);
    }
}
