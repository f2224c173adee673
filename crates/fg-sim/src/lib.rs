//! Quasi-static time simulation of the fan strategies.
//!
//! Provides:
//! - Input validation for (time, demand, resistance) series
//! - Per-step evaluation of every strategy, optionally in parallel
//! - Per-step frames with shortfall/oversupply bookkeeping
//! - Chronological aggregation into energy, SFP, compliance and objective
//!
//! Every timestep is an independent equilibrium; no controller or inertial
//! state carries from one step to the next.

pub mod error;
pub mod frame;
pub mod metrics;
pub mod sim;

pub use error::{SimError, SimResult};
pub use frame::{SimulationFrame, StrategyStep};
pub use metrics::{AggregateMetrics, aggregate};
pub use sim::{SimOptions, SimOutput, SimProgress, run_sim, run_sim_with_progress, step_interval};
