//! Run execution, caching and reload through the service layer.

use std::path::PathBuf;

use fg_app::{
    RunOptions, RunProgressEvent, RunRequest, RunStage, ensure_run, ensure_run_with_progress,
    extract_strategy_series, list_runs, load_run, save_project,
};
use fg_controls::StrategyKind;
use fg_project::schema::{DemandDef, Project};

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("fg_app_{tag}_{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn short_project() -> Project {
    let mut project = Project::demo();
    project.simulation.horizon_s = 600.0;
    project.simulation.dt_s = 10.0;
    project
}

fn write_project(dir: &std::path::Path, project: &Project) -> PathBuf {
    let path = dir.join("project.yaml");
    save_project(&path, project).unwrap();
    path
}

#[test]
fn second_run_hits_cache() {
    let dir = temp_dir("cache");
    let path = write_project(&dir, &short_project());

    let request = RunRequest {
        project_path: &path,
        options: RunOptions::default(),
    };
    let first = ensure_run(&request).unwrap();
    assert!(!first.loaded_from_cache);
    assert_eq!(first.manifest.steps, 61);
    assert_eq!(first.manifest.dt_s, 10.0);
    assert_eq!(first.manifest.time_span_s, [0.0, 600.0]);
    assert_eq!(first.manifest.fan_name, "DemoFan-200mm");

    let second = ensure_run(&request).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(second.run_id, first.run_id);
    assert_eq!(second.manifest, first.manifest);

    let runs = list_runs(&path).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, first.run_id);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn disabling_cache_reruns_with_same_id() {
    let dir = temp_dir("nocache");
    let path = write_project(&dir, &short_project());

    let first = ensure_run(&RunRequest {
        project_path: &path,
        options: RunOptions::default(),
    })
    .unwrap();
    let rerun = ensure_run(&RunRequest {
        project_path: &path,
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
    })
    .unwrap();
    assert!(!rerun.loaded_from_cache);
    assert_eq!(rerun.run_id, first.run_id);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn changed_project_gets_new_run_id() {
    let dir = temp_dir("newid");
    let mut project = short_project();
    let path = write_project(&dir, &project);
    let a = ensure_run(&RunRequest {
        project_path: &path,
        options: RunOptions::default(),
    })
    .unwrap();

    project.strategies.fixed_speed_rpm = 950.0;
    save_project(&path, &project).unwrap();
    let b = ensure_run(&RunRequest {
        project_path: &path,
        options: RunOptions::default(),
    })
    .unwrap();

    assert_ne!(a.run_id, b.run_id);
    assert!(!b.loaded_from_cache);
    assert_eq!(list_runs(&path).unwrap().len(), 2);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn stored_run_reloads_frames_and_metrics() {
    let dir = temp_dir("reload");
    let path = write_project(&dir, &short_project());
    let response = ensure_run(&RunRequest {
        project_path: &path,
        options: RunOptions::default(),
    })
    .unwrap();

    let run = load_run(&path, &response.run_id).unwrap();
    assert_eq!(run.frames.len(), 61);
    assert_eq!(run.metrics.len(), 3);
    assert_eq!(run.metrics[0].strategy, StrategyKind::Fixed);
    assert!(run.metrics[2].energy_wh < run.metrics[0].energy_wh);

    let speeds = extract_strategy_series(&run.frames, StrategyKind::Fixed, "speed").unwrap();
    assert!(speeds.iter().all(|&(_, n)| n == 900.0));

    assert!(load_run(&path, "no-such-run").is_err());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn progress_stages_in_order() {
    let dir = temp_dir("progress");
    let path = write_project(&dir, &short_project());
    let request = RunRequest {
        project_path: &path,
        options: RunOptions::default(),
    };

    let mut events: Vec<RunProgressEvent> = Vec::new();
    let mut cb = |e: RunProgressEvent| events.push(e);
    ensure_run_with_progress(&request, Some(&mut cb)).unwrap();

    let mut stages: Vec<RunStage> = events.iter().map(|e| e.stage).collect();
    stages.dedup();
    assert_eq!(
        stages,
        vec![
            RunStage::LoadingProject,
            RunStage::BuildingProfiles,
            RunStage::CheckingCache,
            RunStage::Simulating,
            RunStage::SavingResults,
            RunStage::Completed,
        ]
    );
    let last_sim = events.iter().filter_map(|e| e.sim.as_ref()).last().unwrap();
    assert_eq!(last_sim.step, 61);
    assert_eq!(last_sim.fraction_complete, 1.0);

    let mut cached: Vec<RunStage> = Vec::new();
    let mut cb = |e: RunProgressEvent| cached.push(e.stage);
    ensure_run_with_progress(&request, Some(&mut cb)).unwrap();
    assert_eq!(cached.last(), Some(&RunStage::Completed));
    assert!(cached.contains(&RunStage::LoadingCachedResult));
    assert!(!cached.contains(&RunStage::Simulating));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn csv_demand_is_part_of_the_run_id() {
    let dir = temp_dir("csv");
    let mut project = short_project();
    project.demand = DemandDef::Csv {
        path: "demand.csv".to_string(),
    };
    let path = write_project(&dir, &project);
    let csv = dir.join("demand.csv");

    std::fs::write(&csv, "time_s,airflow_demand_cfm\n0,280\n60,300\n120,320\n").unwrap();
    let a = ensure_run(&RunRequest {
        project_path: &path,
        options: RunOptions::default(),
    })
    .unwrap();
    assert_eq!(a.manifest.steps, 3);
    assert_eq!(a.manifest.dt_s, 60.0);

    std::fs::write(&csv, "time_s,airflow_demand_cfm\n0,280\n60,300\n120,330\n").unwrap();
    let b = ensure_run(&RunRequest {
        project_path: &path,
        options: RunOptions::default(),
    })
    .unwrap();
    assert_ne!(a.run_id, b.run_id);
    assert!(!b.loaded_from_cache);

    let _ = std::fs::remove_dir_all(dir);
}
