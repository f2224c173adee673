//! Project validation logic.

use crate::LATEST_VERSION;
use crate::schema::{DemandDef, FanDef, FoulingDef, Project, SimulationDef, StrategiesDef, SystemDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing value: {field}")]
    Missing { field: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_fan(&project.fan)?;
    validate_system(&project.system)?;
    validate_power(project)?;
    validate_strategies(&project.strategies)?;
    validate_simulation(&project.simulation)?;
    validate_demand(&project.demand)?;
    validate_fouling(&project.fouling)?;
    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive and finite"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative and finite"))
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn fraction(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, value, "must lie in [0, 1]"))
    }
}

fn validate_fan(fan: &FanDef) -> Result<(), ValidationError> {
    if fan.name.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "fan.name".to_string(),
        });
    }
    positive("fan.bep_airflow_cfm", fan.bep_airflow_cfm)?;
    positive("fan.bep_pressure_pa", fan.bep_pressure_pa)?;
    positive("fan.bep_power_w", fan.bep_power_w)?;
    positive("fan.reference_speed_rpm", fan.reference_speed_rpm)?;
    if !fan.shape_exponent.is_finite() || fan.shape_exponent < 2.0 {
        return Err(invalid(
            "fan.shape_exponent",
            fan.shape_exponent,
            "must be at least 2",
        ));
    }
    Ok(())
}

fn validate_system(system: &SystemDef) -> Result<(), ValidationError> {
    non_negative("system.k_clean", system.k_clean)?;
    non_negative("system.k_fouled", system.k_fouled)
}

fn validate_power(project: &Project) -> Result<(), ValidationError> {
    let power = &project.power;
    finite("power.idle_fraction", power.idle_fraction)?;
    finite("power.free_delivery_power_ratio", power.free_delivery_power_ratio)?;
    finite("power.bep_flow_fraction", power.bep_flow_fraction)
}

fn validate_strategies(strategies: &StrategiesDef) -> Result<(), ValidationError> {
    positive("strategies.fixed_speed_rpm", strategies.fixed_speed_rpm)?;

    if strategies.mode_speeds_rpm.is_empty() {
        return Err(ValidationError::Missing {
            field: "strategies.mode_speeds_rpm".to_string(),
        });
    }
    for (i, &speed) in strategies.mode_speeds_rpm.iter().enumerate() {
        positive(&format!("strategies.mode_speeds_rpm[{i}]"), speed)?;
    }

    let [lo, hi] = strategies.speed_bounds_rpm;
    positive("strategies.speed_bounds_rpm[0]", lo)?;
    positive("strategies.speed_bounds_rpm[1]", hi)?;
    if lo > hi {
        return Err(invalid(
            "strategies.speed_bounds_rpm",
            format!("[{lo}, {hi}]"),
            "lower bound exceeds upper bound",
        ));
    }

    non_negative("strategies.tolerance_cfm", strategies.tolerance_cfm)?;
    if strategies.max_bisection_iterations == 0 {
        return Err(invalid(
            "strategies.max_bisection_iterations",
            0,
            "must be at least 1",
        ));
    }
    non_negative("strategies.shortfall_penalty", strategies.shortfall_penalty)
}

/// Most timesteps a sinusoidal profile may expand to.
pub const MAX_PROFILE_STEPS: f64 = 1e8;

fn validate_simulation(simulation: &SimulationDef) -> Result<(), ValidationError> {
    positive("simulation.horizon_s", simulation.horizon_s)?;
    positive("simulation.dt_s", simulation.dt_s)?;
    if simulation.horizon_s / simulation.dt_s > MAX_PROFILE_STEPS {
        return Err(invalid(
            "simulation.dt_s",
            simulation.dt_s,
            "too small for the horizon (more than 1e8 steps)",
        ));
    }
    if simulation.grid_points < 2 {
        return Err(invalid(
            "simulation.grid_points",
            simulation.grid_points,
            "must be at least 2",
        ));
    }
    Ok(())
}

fn validate_demand(demand: &DemandDef) -> Result<(), ValidationError> {
    match demand {
        DemandDef::Sinusoid {
            base_cfm,
            amplitude_cfm,
        } => {
            finite("demand.base_cfm", *base_cfm)?;
            finite("demand.amplitude_cfm", *amplitude_cfm)
        }
        DemandDef::Csv { path } => {
            if path.trim().is_empty() {
                Err(ValidationError::Missing {
                    field: "demand.path".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }
}

fn validate_fouling(fouling: &FoulingDef) -> Result<(), ValidationError> {
    fraction("fouling.start_fraction", fouling.start_fraction)?;
    fraction("fouling.end_fraction", fouling.end_fraction)?;
    if fouling.start_fraction > fouling.end_fraction {
        return Err(invalid(
            "fouling",
            format!("{} > {}", fouling.start_fraction, fouling.end_fraction),
            "ramp must start before it ends",
        ));
    }
    Ok(())
}
