//! Result data types.

use serde::{Deserialize, Serialize};

pub use fg_sim::{AggregateMetrics, SimulationFrame};

pub type RunId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project_name: String,
    pub fan_name: String,
    /// RFC 3339 creation time
    pub timestamp: String,
    pub solver_version: String,
    pub demand_source: DemandSource,
    pub steps: usize,
    /// Integration interval (s)
    pub dt_s: f64,
    /// First and last timestamp (s)
    pub time_span_s: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DemandSource {
    Sinusoid,
    Csv { path: String },
}

/// Current UTC time in the manifest timestamp format.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
