//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use fg_project::schema::{DemandDef, Project};
use fg_results::{
    AggregateMetrics, DemandSource, RunManifest, RunStore, SimulationFrame, compute_run_id,
    timestamp_now,
};
use fg_sim::{SimOutput, SimProgress};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::profiles::{self, Profiles};
use crate::progress::{RunProgressEvent, RunStage};
use crate::project_service;

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: "0.1.0".to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub options: RunOptions,
}

/// Wall-clock breakdown of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub build_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

/// A stored run read back from disk.
#[derive(Debug, Clone)]
pub struct LoadedRun {
    pub manifest: RunManifest,
    pub frames: Vec<SimulationFrame>,
    pub metrics: Vec<AggregateMetrics>,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    sim: Option<SimProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            sim,
            ..RunProgressEvent::stage(stage, started.elapsed().as_secs_f64(), message)
        });
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingProject,
        started,
        Some("Loading project".to_string()),
        None,
    );

    let project = project_service::load_project(request.project_path)?;
    let study = project_service::compile_study(&project)?;

    emit_progress(
        &mut progress_cb,
        RunStage::BuildingProfiles,
        started,
        Some("Building demand and fouling profiles".to_string()),
        None,
    );

    let build_started = Instant::now();
    let project_dir = project_service::project_dir(request.project_path);
    let (profiles, demand_data) = profiles::profiles_for_project(&project, &project_dir)?;
    timing.build_time_s = build_started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::CheckingCache,
        started,
        Some("Checking run cache".to_string()),
        None,
    );

    let run_id = compute_run_id(
        &project,
        demand_data.as_deref(),
        &request.options.solver_version,
    );
    let store = RunStore::for_project(request.project_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            Some("Loading cached run".to_string()),
            None,
        );

        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        info!(run_id = %run_id, "using cached run");

        emit_progress(
            &mut progress_cb,
            RunStage::Completed,
            started,
            Some("Loaded cached run".to_string()),
            None,
        );

        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    emit_progress(
        &mut progress_cb,
        RunStage::Simulating,
        started,
        Some(format!("Simulating {} steps", profiles.time.len())),
        None,
    );

    let sim_started = Instant::now();
    let output = {
        let mut forward = |p: SimProgress| {
            emit_progress(&mut progress_cb, RunStage::Simulating, started, None, Some(p));
        };
        fg_sim::run_sim_with_progress(
            &study.fan,
            &study.power,
            &profiles.time,
            &profiles.demand,
            &profiles.resistance,
            &study.strategies,
            &study.sim_options,
            Some(&mut forward as &mut dyn FnMut(SimProgress)),
        )?
    };
    timing.simulate_time_s = sim_started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::SavingResults,
        started,
        Some("Saving results".to_string()),
        None,
    );

    let save_started = Instant::now();
    let manifest = build_manifest(&project, &run_id, &request.options.solver_version, &profiles, &output);
    store.save_run(&manifest, &output.frames, &output.metrics)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    debug!(
        run_id = %run_id,
        simulate_s = timing.simulate_time_s,
        total_s = timing.total_time_s,
        "run saved"
    );

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

fn build_manifest(
    project: &Project,
    run_id: &str,
    solver_version: &str,
    profiles: &Profiles,
    output: &SimOutput,
) -> RunManifest {
    let demand_source = match &project.demand {
        DemandDef::Sinusoid { .. } => DemandSource::Sinusoid,
        DemandDef::Csv { path } => DemandSource::Csv { path: path.clone() },
    };
    let t_first = profiles.time.first().copied().unwrap_or(0.0);
    let t_last = profiles.time.last().copied().unwrap_or(0.0);

    RunManifest {
        run_id: run_id.to_string(),
        project_name: project.name.clone(),
        fan_name: project.fan.name.clone(),
        timestamp: timestamp_now(),
        solver_version: solver_version.to_string(),
        demand_source,
        steps: output.frames.len(),
        dt_s: output.dt_s,
        time_span_s: [t_first, t_last],
    }
}

/// List stored runs of a project, most recent first.
pub fn list_runs(project_path: &Path) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_project(project_path)?;
    Ok(store.list_runs()?)
}

/// Load a specific run.
pub fn load_run(project_path: &Path, run_id: &str) -> AppResult<LoadedRun> {
    let store = RunStore::for_project(project_path)?;

    let manifest = store.load_manifest(run_id)?;
    let frames = store.load_frames(run_id)?;
    let metrics = store.load_metrics(run_id)?;

    Ok(LoadedRun {
        manifest,
        frames,
        metrics,
    })
}

/// Remove a stored run.
pub fn delete_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    let store = RunStore::for_project(project_path)?;
    store.delete_run(run_id)?;
    Ok(())
}
