//! Project schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub fan: FanDef,
    #[serde(default)]
    pub system: SystemDef,
    #[serde(default)]
    pub power: PowerDef,
    #[serde(default)]
    pub strategies: StrategiesDef,
    #[serde(default)]
    pub simulation: SimulationDef,
    #[serde(default)]
    pub demand: DemandDef,
    #[serde(default)]
    pub fouling: FoulingDef,
}

impl Project {
    /// The 200 mm demo fan over a one-hour fouling day.
    pub fn demo() -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: "Demo fan study".to_string(),
            fan: FanDef {
                name: "DemoFan-200mm".to_string(),
                bep_airflow_cfm: 300.0,
                bep_pressure_pa: 120.0,
                bep_power_w: 40.0,
                reference_speed_rpm: 1200.0,
                shape_exponent: default_shape_exponent(),
            },
            system: SystemDef::default(),
            power: PowerDef::default(),
            strategies: StrategiesDef::default(),
            simulation: SimulationDef::default(),
            demand: DemandDef::default(),
            fouling: FoulingDef::default(),
        }
    }
}

/// Fan catalog data at the best-efficiency point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FanDef {
    pub name: String,
    pub bep_airflow_cfm: f64,
    pub bep_pressure_pa: f64,
    pub bep_power_w: f64,
    pub reference_speed_rpm: f64,
    #[serde(default = "default_shape_exponent")]
    pub shape_exponent: f64,
}

fn default_shape_exponent() -> f64 {
    2.0
}

/// Duct resistance coefficients, `Δp = k·Q²` in Pa with Q in cfm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemDef {
    pub k_clean: f64,
    pub k_fouled: f64,
}

impl Default for SystemDef {
    fn default() -> Self {
        Self {
            k_clean: 6.0e-5,
            k_fouled: 4.0e-4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerDef {
    pub idle_fraction: f64,
    pub free_delivery_power_ratio: f64,
    pub bep_flow_fraction: f64,
}

impl Default for PowerDef {
    fn default() -> Self {
        Self {
            idle_fraction: 0.22,
            free_delivery_power_ratio: 2.0,
            bep_flow_fraction: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategiesDef {
    pub fixed_speed_rpm: f64,
    pub mode_speeds_rpm: Vec<f64>,
    pub speed_bounds_rpm: [f64; 2],
    pub tolerance_cfm: f64,
    pub max_bisection_iterations: usize,
    pub shortfall_penalty: f64,
}

impl Default for StrategiesDef {
    fn default() -> Self {
        Self {
            fixed_speed_rpm: 900.0,
            mode_speeds_rpm: vec![700.0, 800.0, 900.0, 1000.0],
            speed_bounds_rpm: [500.0, 2000.0],
            tolerance_cfm: 5.0,
            max_bisection_iterations: 24,
            shortfall_penalty: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationDef {
    pub horizon_s: f64,
    pub dt_s: f64,
    pub grid_points: usize,
    pub parallel: bool,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            horizon_s: 3600.0,
            dt_s: 1.0,
            grid_points: 800,
            parallel: false,
        }
    }
}

/// Source of the airflow demand series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DemandDef {
    /// `base + amplitude·sin(2πt/horizon)` sampled every `dt_s`
    Sinusoid { base_cfm: f64, amplitude_cfm: f64 },
    /// CSV with `time_s` and `airflow_demand_cfm` columns; relative paths
    /// resolve against the project file's directory
    Csv { path: String },
}

impl Default for DemandDef {
    fn default() -> Self {
        Self::Sinusoid {
            base_cfm: 300.0,
            amplitude_cfm: 75.0,
        }
    }
}

/// Fouling ramp as fractions of the horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FoulingDef {
    pub start_fraction: f64,
    pub end_fraction: f64,
}

impl Default for FoulingDef {
    fn default() -> Self {
        Self {
            start_fraction: 0.15,
            end_fraction: 0.85,
        }
    }
}
