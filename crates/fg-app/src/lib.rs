//! Shared application service layer for fangait.
//!
//! Centralizes project management, profile construction, run execution
//! and caching, result queries, curve tables and report rendering so the
//! CLI stays a thin argument-parsing shell.

pub mod curves;
pub mod error;
pub mod profiles;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod report;
pub mod run_service;

// Re-export key types for convenience
pub use curves::{
    CurvePoint, EfficiencySweep, OperatingPointRow, efficiency_sweep, operating_point_table,
};
pub use error::{AppError, AppResult};
pub use profiles::{
    DemandSeries, FoulingRamp, Profiles, build_profiles, load_demand_csv, profiles_for_project,
};
pub use progress::{RunProgressEvent, RunStage};
pub use project_service::{
    CompiledStudy, compile_study, load_project, project_dir, save_project, validate_project,
};
pub use query::{RunSummary, extract_frame_series, extract_strategy_series, get_run_summary};
pub use report::{console_summary, period_label, savings_vs_fixed, write_result_sheet};
pub use run_service::{
    LoadedRun, RunOptions, RunRequest, RunResponse, RunTimingSummary, delete_run, ensure_run,
    ensure_run_with_progress, list_runs, load_run,
};
