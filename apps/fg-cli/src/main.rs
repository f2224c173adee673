use clap::{Parser, Subcommand};
use fg_app::{
    AppError, AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, curves,
    project_service, query, report, run_service,
};
use fg_controls::StrategyKind;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fg-cli")]
#[command(about = "Fan gait CLI - compare fixed, mode-switch and variable fan speed control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the demo project to a new file
    Init {
        /// Path of the project file to create (.yaml or .json)
        project_path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Validate project file syntax and values
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Simulate all three strategies and print the summary
    Run {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a project
    Runs {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export time series data from a run
    ExportSeries {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Variable name: demand, resistance, or a strategy variable
        /// (airflow, speed, power, shortfall, oversupply, compliant)
        variable: String,
        /// Strategy for strategy variables (fixed, mode, variable)
        #[arg(short, long)]
        strategy: Option<StrategyKind>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print operating points and peak efficiency for each mode speed
    Curves {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Write the efficiency sweeps as CSV to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write Markdown and HTML result sheets for a run
    Report {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID (defaults to running or loading the current project)
        #[arg(long)]
        run_id: Option<String>,
        /// Output directory (defaults to `report/` next to the project)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            project_path,
            force,
        } => cmd_init(&project_path, force),
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Run {
            project_path,
            no_cache,
        } => cmd_run(&project_path, !no_cache),
        Commands::Runs { project_path } => cmd_runs(&project_path),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
        Commands::ExportSeries {
            project_path,
            run_id,
            variable,
            strategy,
            output,
        } => cmd_export_series(
            &project_path,
            &run_id,
            &variable,
            strategy,
            output.as_deref(),
        ),
        Commands::Curves {
            project_path,
            output,
        } => cmd_curves(&project_path, output.as_deref()),
        Commands::Report {
            project_path,
            run_id,
            out_dir,
        } => cmd_report(&project_path, run_id.as_deref(), out_dir.as_deref()),
    }
}

fn cmd_init(project_path: &Path, force: bool) -> AppResult<()> {
    if project_path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            project_path.display()
        )));
    }
    project_service::save_project(project_path, &fg_project::schema::Project::demo())?;
    println!("✓ Wrote demo project to {}", project_path.display());
    Ok(())
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::compile_study(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

/// Run (or load from cache) and return the run id.
fn execute(project_path: &Path, use_cache: bool) -> AppResult<String> {
    let request = RunRequest {
        project_path,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage: Option<RunStage> = None;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Simulation completed: {}", response.run_id);
        let t = &response.timing;
        println!(
            "  Build: {:.3}s  Simulate: {:.3}s  Save: {:.3}s  Total: {:.3}s",
            t.build_time_s, t.simulate_time_s, t.save_time_s, t.total_time_s
        );
    }
    Ok(response.run_id)
}

fn cmd_run(project_path: &Path, use_cache: bool) -> AppResult<()> {
    let run_id = execute(project_path, use_cache)?;
    let run = run_service::load_run(project_path, &run_id)?;
    let span = run.manifest.time_span_s[1] - run.manifest.time_span_s[0];

    println!(
        "  Steps: {}  dt: {} s",
        run.manifest.steps, run.manifest.dt_s
    );
    println!();
    println!(
        "{}",
        report::console_summary(&run.metrics, &report::period_label(span))?
    );
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn stage_label(stage: RunStage) -> &'static str {
    match stage {
        RunStage::LoadingProject => "loading project",
        RunStage::CheckingCache => "checking cache",
        RunStage::LoadingCachedResult => "loading cached run",
        RunStage::BuildingProfiles => "building profiles",
        RunStage::Simulating => "simulating",
        RunStage::SavingResults => "saving",
        RunStage::Completed => "done",
    }
}

fn render_cli_progress(event: &RunProgressEvent) {
    if let Some(p) = &event.sim {
        let width = 28usize;
        let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
        let bar = format!(
            "{}{}",
            "#".repeat(filled),
            "-".repeat(width.saturating_sub(filled))
        );
        print!(
            "\r[{}] {:>6.2}%  t={:.0}s  step={}/{}  elapsed={:.1}s",
            bar,
            p.fraction_complete * 100.0,
            p.sim_time_s,
            p.step,
            p.total_steps,
            event.elapsed_wall_s
        );
    } else {
        let spinner = ['|', '/', '-', '\\'];
        let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
        let mut line = format!(
            "\r{} {}  elapsed={:.2}s",
            spinner[spin_idx],
            stage_label(event.stage),
            event.elapsed_wall_s
        );
        if let Some(msg) = &event.message {
            line.push_str(&format!("  {}", msg));
        }
        print!("{}", line);
    }
    let _ = io::stdout().flush();
}

fn cmd_runs(project_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(project_path)?;

    if runs.is_empty() {
        println!("No cached runs found for {}", project_path.display());
    } else {
        println!("Cached runs:");
        for manifest in runs {
            println!(
                "  {} ({}, {} steps)",
                manifest.run_id, manifest.timestamp, manifest.steps
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let run = run_service::load_run(project_path, run_id)?;
    let summary = query::get_run_summary(&run.frames)?;

    println!("\nRun Summary:");
    println!("  Project: {}", run.manifest.project_name);
    println!("  Fan: {}", run.manifest.fan_name);
    println!("  Created: {}", run.manifest.timestamp);
    println!("  Time points: {}", summary.frame_count);
    println!(
        "  Time range: {:.1} - {:.1} s (dt = {} s)",
        summary.time_range.0, summary.time_range.1, run.manifest.dt_s
    );
    println!(
        "  Demand: {:.1} - {:.1} cfm",
        summary.demand_range.0, summary.demand_range.1
    );
    println!(
        "  Resistance: {:.3e} - {:.3e} Pa/cfm²",
        summary.resistance_range.0, summary.resistance_range.1
    );

    println!("\nStrategies:");
    for m in &run.metrics {
        println!(
            "  {:<11} energy={:.2} Wh  delivered={:.1} cfm·h  shortfall={:.2}  oversupply={:.2}  compliance={:.1}%  objective={:.3}",
            m.strategy.label(),
            m.energy_wh,
            m.delivered_cfm_h,
            m.shortfall_cfm_h,
            m.oversupply_cfm_h,
            m.compliance_pct,
            m.objective
        );
    }

    Ok(())
}

fn cmd_export_series(
    project_path: &Path,
    run_id: &str,
    variable: &str,
    strategy: Option<StrategyKind>,
    output: Option<&Path>,
) -> AppResult<()> {
    let run = run_service::load_run(project_path, run_id)?;

    let series = match strategy {
        Some(kind) => query::extract_strategy_series(&run.frames, kind, variable)?,
        None => query::extract_frame_series(&run.frames, variable).map_err(|_| {
            AppError::InvalidInput(format!(
                "'{variable}' is not a frame variable; pass --strategy for strategy variables"
            ))
        })?,
    };

    let mut csv = String::from("time_s,value\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    if let Some(path) = output {
        std::fs::write(path, csv).map_err(|source| AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_curves(project_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let study = project_service::compile_study(&project)?;
    let speeds = &project.strategies.mode_speeds_rpm;

    let rows = curves::operating_point_table(
        &study.fan,
        &study.power,
        speeds,
        project.system.k_clean,
        project.system.k_fouled,
        &study.strategies.grid(),
    );

    println!("Operating points ({}):", project.fan.name);
    println!(
        "  {:>7}  {:>22}  {:>22}",
        "rpm", "clean cfm / Pa / W", "fouled cfm / Pa / W"
    );
    for row in &rows {
        println!(
            "  {:>7.0}  {:>7.1} /{:>6.1} /{:>6.1}  {:>7.1} /{:>6.1} /{:>6.1}",
            row.speed_rpm,
            row.clean.airflow_cfm,
            row.clean.pressure_pa,
            row.clean.power_w,
            row.fouled.airflow_cfm,
            row.fouled.pressure_pa,
            row.fouled.power_w
        );
    }

    let sweeps: Vec<_> = speeds
        .iter()
        .map(|&n| {
            curves::efficiency_sweep(
                &study.fan,
                &study.power,
                n,
                0.01,
                0.99,
                curves::DEFAULT_SWEEP_POINTS,
            )
        })
        .collect();

    println!("\nPeak airflow per watt:");
    for sweep in &sweeps {
        match sweep.peak {
            Some((q, eff)) => println!(
                "  {:>7.0} rpm  {:.3} cfm/W at {:.1} cfm",
                sweep.speed_rpm, eff, q
            ),
            None => println!("  {:>7.0} rpm  no positive-power points", sweep.speed_rpm),
        }
    }

    if let Some(path) = output {
        let mut csv = String::from("speed_rpm,airflow_cfm,cfm_per_w\n");
        for sweep in &sweeps {
            for (q, eff) in &sweep.points {
                csv.push_str(&format!("{},{},{}\n", sweep.speed_rpm, q, eff));
            }
        }
        std::fs::write(path, csv).map_err(|source| AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        println!("✓ Wrote efficiency sweeps to {}", path.display());
    }

    Ok(())
}

fn cmd_report(project_path: &Path, run_id: Option<&str>, out_dir: Option<&Path>) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let run_id = match run_id {
        Some(id) => id.to_string(),
        None => execute(project_path, true)?,
    };
    let run = run_service::load_run(project_path, &run_id)?;
    let span = run.manifest.time_span_s[1] - run.manifest.time_span_s[0];
    let label = report::period_label(span);

    println!("{}", report::console_summary(&run.metrics, &label)?);

    let out_dir = out_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_service::project_dir(project_path).join("report"));
    let (md, html) = report::write_result_sheet(&out_dir, &project, &run.metrics, &label)?;
    println!("✓ Wrote {}", md.display());
    println!("✓ Wrote {}", html.display());
    Ok(())
}
