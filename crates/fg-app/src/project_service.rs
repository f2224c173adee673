//! Project loading, saving, validation, and model compilation.

use std::path::{Path, PathBuf};

use fg_components::{ConvexPowerModel, FanCurve, PowerShape};
use fg_controls::StrategyConfig;
use fg_project::schema::Project;
use fg_sim::SimOptions;

use crate::error::{AppError, AppResult};

/// Load a project file (YAML, or JSON by extension) and validate it.
pub fn load_project(path: &Path) -> AppResult<Project> {
    if !path.exists() {
        return Err(AppError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(fg_project::load_project(path)?)
}

/// Validate and save a project; `.json` paths are written as JSON.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    fg_project::save_project(path, project)?;
    Ok(())
}

pub fn validate_project(project: &Project) -> AppResult<()> {
    fg_project::validate_project(project)?;
    Ok(())
}

/// Directory against which relative paths in the project resolve.
pub fn project_dir(project_path: &Path) -> PathBuf {
    project_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Domain models built from a validated project.
#[derive(Debug, Clone)]
pub struct CompiledStudy {
    pub fan: FanCurve,
    pub power: ConvexPowerModel,
    pub strategies: StrategyConfig,
    pub sim_options: SimOptions,
}

/// Build the fan, power model and strategy settings of a project.
pub fn compile_study(project: &Project) -> AppResult<CompiledStudy> {
    validate_project(project)?;

    let fan = FanCurve::from_bep(
        project.fan.bep_airflow_cfm,
        project.fan.bep_pressure_pa,
        project.fan.reference_speed_rpm,
        project.fan.shape_exponent,
    )?;

    let shape = PowerShape {
        idle_fraction: project.power.idle_fraction,
        free_delivery_ratio: project.power.free_delivery_power_ratio,
        bep_flow_fraction: project.power.bep_flow_fraction,
    };
    let power = ConvexPowerModel::new(
        project.fan.bep_power_w,
        project.fan.reference_speed_rpm,
        shape,
    )?;

    let s = &project.strategies;
    let strategies = StrategyConfig {
        fixed_speed_rpm: s.fixed_speed_rpm,
        mode_speeds_rpm: s.mode_speeds_rpm.clone(),
        speed_bounds_rpm: (s.speed_bounds_rpm[0], s.speed_bounds_rpm[1]),
        tolerance_cfm: s.tolerance_cfm,
        max_bisection_iterations: s.max_bisection_iterations,
        shortfall_penalty: s.shortfall_penalty,
        grid_points: project.simulation.grid_points,
    };
    strategies.validate()?;

    Ok(CompiledStudy {
        fan,
        power,
        strategies,
        sim_options: SimOptions {
            parallel: project.simulation.parallel,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_components::FanModel;

    #[test]
    fn compile_demo_project() {
        let study = compile_study(&Project::demo()).unwrap();
        assert_eq!(study.fan.free_delivery(1200.0), 300.0 / 0.6);
        assert_eq!(study.strategies, StrategyConfig::default());
        assert!(!study.sim_options.parallel);
        assert!(!study.power.coefficients().fallback);
    }

    #[test]
    fn compile_rejects_invalid_project() {
        let mut project = Project::demo();
        project.strategies.mode_speeds_rpm.clear();
        assert!(matches!(compile_study(&project), Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_project_file_reports_path() {
        let err = load_project(Path::new("/nonexistent/fangait/project.yaml")).unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
    }

    #[test]
    fn project_dir_of_bare_file_is_cwd() {
        assert_eq!(project_dir(Path::new("study.yaml")), PathBuf::from(""));
        assert_eq!(project_dir(Path::new("a/b/study.yaml")), PathBuf::from("a/b"));
    }
}
