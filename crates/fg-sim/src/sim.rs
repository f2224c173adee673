//! Simulation runner.

use crate::error::{SimError, SimResult};
use crate::frame::{SimulationFrame, StrategyStep};
use crate::metrics::{AggregateMetrics, aggregate};
use fg_components::{FanModel, PowerModel};
use fg_controls::{StrategyConfig, StrategyKind, StrategySelector};
use fg_core::median;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Options for simulation runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Evaluate timesteps on the rayon thread pool. Results are identical
    /// to the sequential path.
    pub parallel: bool,
}

/// Progress snapshot passed to the callback of [`run_sim_with_progress`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimProgress {
    /// Steps evaluated so far
    pub step: usize,
    pub total_steps: usize,
    /// Time of the last evaluated step (s)
    pub sim_time_s: f64,
    pub fraction_complete: f64,
}

/// Frames and per-strategy metrics of one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimOutput {
    /// Step interval used for integration (s)
    pub dt_s: f64,
    pub frames: Vec<SimulationFrame>,
    /// Metrics in [`StrategyKind::ALL`] order
    pub metrics: Vec<AggregateMetrics>,
}

impl SimOutput {
    pub fn metrics_for(&self, kind: StrategyKind) -> Option<&AggregateMetrics> {
        self.metrics.iter().find(|m| m.strategy == kind)
    }
}

/// Integration interval of a timestamp series: the median spacing, or 1 s
/// for a single sample.
pub fn step_interval(time: &[f64]) -> f64 {
    let diffs: Vec<f64> = time.windows(2).map(|w| w[1] - w[0]).collect();
    median(&diffs).unwrap_or(1.0)
}

/// Run every strategy over the series.
///
/// # Errors
/// Returns error on malformed series or strategy configuration. Nothing is
/// evaluated unless every check passes.
pub fn run_sim(
    fan: &dyn FanModel,
    power: &dyn PowerModel,
    time: &[f64],
    demand: &[f64],
    resistance: &[f64],
    config: &StrategyConfig,
    opts: &SimOptions,
) -> SimResult<SimOutput> {
    run_sim_with_progress(fan, power, time, demand, resistance, config, opts, None)
}

/// [`run_sim`] with a progress callback, invoked roughly every percent of
/// the run and once at the end.
#[allow(clippy::too_many_arguments)]
pub fn run_sim_with_progress(
    fan: &dyn FanModel,
    power: &dyn PowerModel,
    time: &[f64],
    demand: &[f64],
    resistance: &[f64],
    config: &StrategyConfig,
    opts: &SimOptions,
    mut progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<SimOutput> {
    validate_series(time, demand, resistance)?;
    let selector = StrategySelector::new(fan, power, config)?;

    let total = time.len();
    let dt_s = step_interval(time);
    if total == 1 {
        warn!("single-sample series, integrating over a 1 s interval");
    } else if dt_s == 0.0 {
        warn!("median timestamp spacing is zero, integrals will be zero");
    }
    debug!(steps = total, dt_s, parallel = opts.parallel, "starting simulation");

    let tol = config.tolerance_cfm;
    let evaluate = |i: usize| {
        let decisions = selector.decide_all(demand[i], resistance[i]);
        SimulationFrame {
            time: time[i],
            demand: demand[i],
            resistance: resistance[i],
            strategies: decisions.map(|d| StrategyStep::classify(d, demand[i], tol)),
        }
    };

    let chunk = (total / 100).max(1);
    let mut frames = Vec::with_capacity(total);
    let mut start = 0;
    while start < total {
        let end = (start + chunk).min(total);
        if opts.parallel {
            let block: Vec<SimulationFrame> = (start..end).into_par_iter().map(evaluate).collect();
            frames.extend(block);
        } else {
            frames.extend((start..end).map(evaluate));
        }
        if let Some(cb) = progress.as_deref_mut() {
            cb(SimProgress {
                step: end,
                total_steps: total,
                sim_time_s: time[end - 1],
                fraction_complete: end as f64 / total as f64,
            });
        }
        start = end;
    }

    let metrics: Vec<AggregateMetrics> = StrategyKind::ALL
        .iter()
        .map(|&kind| aggregate(&frames, kind, dt_s, config.shortfall_penalty))
        .collect();

    for m in &metrics {
        debug!(
            strategy = m.strategy.key(),
            energy_wh = m.energy_wh,
            compliance_pct = m.compliance_pct,
            "strategy aggregated"
        );
    }

    Ok(SimOutput {
        dt_s,
        frames,
        metrics,
    })
}

fn validate_series(time: &[f64], demand: &[f64], resistance: &[f64]) -> SimResult<()> {
    if time.len() != demand.len() || time.len() != resistance.len() {
        return Err(SimError::LengthMismatch {
            time: time.len(),
            demand: demand.len(),
            resistance: resistance.len(),
        });
    }
    if time.is_empty() {
        return Err(SimError::Empty);
    }

    for (what, series) in [("time", time), ("demand", demand), ("resistance", resistance)] {
        if let Some((index, &value)) = series.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::NonFinite { what, index, value });
        }
    }

    if let Some(index) = (1..time.len()).find(|&i| time[i] < time[i - 1]) {
        return Err(SimError::NonMonotonicTime {
            index,
            previous: time[index - 1],
            current: time[index],
        });
    }

    if let Some((index, &value)) = resistance.iter().enumerate().find(|(_, k)| **k < 0.0) {
        return Err(SimError::NegativeResistance { index, value });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_components::{ConvexPowerModel, FanCurve, PowerShape};

    fn models() -> (FanCurve, ConvexPowerModel) {
        (
            FanCurve::from_bep(300.0, 120.0, 1200.0, 2.0).unwrap(),
            ConvexPowerModel::new(40.0, 1200.0, PowerShape::default()).unwrap(),
        )
    }

    fn run(time: &[f64], demand: &[f64], k: &[f64]) -> SimResult<SimOutput> {
        let (fan, power) = models();
        run_sim(&fan, &power, time, demand, k, &StrategyConfig::default(), &SimOptions::default())
    }

    #[test]
    fn step_interval_uses_median_spacing() {
        assert_eq!(step_interval(&[0.0, 1.0, 2.0, 62.0, 63.0]), 1.0);
        assert_eq!(step_interval(&[0.0, 1.0, 3.0]), 1.5);
        assert_eq!(step_interval(&[5.0]), 1.0);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = run(&[0.0, 1.0], &[300.0], &[6e-5, 6e-5]).unwrap_err();
        assert!(matches!(err, SimError::LengthMismatch { time: 2, demand: 1, resistance: 2 }));
    }

    #[test]
    fn rejects_empty_series() {
        assert_eq!(run(&[], &[], &[]).unwrap_err(), SimError::Empty);
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = run(&[0.0, 1.0], &[300.0, f64::NAN], &[6e-5, 6e-5]).unwrap_err();
        assert!(matches!(err, SimError::NonFinite { what: "demand", index: 1, .. }));
    }

    #[test]
    fn rejects_decreasing_time() {
        let err = run(&[0.0, 2.0, 1.0], &[300.0; 3], &[6e-5; 3]).unwrap_err();
        assert!(matches!(err, SimError::NonMonotonicTime { index: 2, .. }));
    }

    #[test]
    fn rejects_negative_resistance() {
        let err = run(&[0.0, 1.0], &[300.0; 2], &[6e-5, -1e-5]).unwrap_err();
        assert!(matches!(err, SimError::NegativeResistance { index: 1, .. }));
    }

    #[test]
    fn rejects_invalid_strategy_config() {
        let (fan, power) = models();
        let config = StrategyConfig {
            tolerance_cfm: -1.0,
            ..StrategyConfig::default()
        };
        let err = run_sim(&fan, &power, &[0.0], &[300.0], &[6e-5], &config, &SimOptions::default())
            .unwrap_err();
        assert!(matches!(err, SimError::Control(_)));
    }

    #[test]
    fn repeated_timestamps_are_accepted() {
        let out = run(&[0.0, 0.0, 1.0], &[300.0; 3], &[6e-5; 3]).unwrap();
        assert_eq!(out.frames.len(), 3);
        assert_eq!(out.dt_s, 0.5);
    }

    #[test]
    fn single_sample_integrates_one_second() {
        let out = run(&[0.0], &[300.0], &[6e-5]).unwrap();
        assert_eq!(out.dt_s, 1.0);
        assert_eq!(out.frames.len(), 1);
        for m in &out.metrics {
            let step = out.frames[0].step(m.strategy);
            assert!((m.energy_wh - step.power / 3600.0).abs() < 1e-15);
            assert_eq!(m.steps, 1);
        }
    }

    #[test]
    fn aggregates_match_frames() {
        let time: Vec<f64> = (0..120).map(|i| i as f64 * 30.0).collect();
        let demand: Vec<f64> = time.iter().map(|t| 300.0 + 75.0 * (t / 600.0).sin()).collect();
        let k: Vec<f64> = time.iter().map(|t| 6e-5 + 1e-7 * t).collect();
        let out = run(&time, &demand, &k).unwrap();

        assert_eq!(out.dt_s, 30.0);
        for kind in StrategyKind::ALL {
            let m = out.metrics_for(kind).unwrap();
            let sum_power: f64 = out.frames.iter().map(|f| f.step(kind).power).sum();
            let sum_flow: f64 = out.frames.iter().map(|f| f.step(kind).airflow).sum();
            assert!((m.energy_wh - sum_power * out.dt_s / 3600.0).abs() < 1e-9);
            assert!((m.delivered_cfm_h - sum_flow * out.dt_s / 3600.0).abs() < 1e-9);
            assert!((m.sfp - m.energy_wh / m.delivered_cfm_h).abs() < 1e-12);
        }
    }

    #[test]
    fn frames_keep_input_order() {
        let time = [0.0, 10.0, 20.0, 30.0];
        let demand = [250.0, 300.0, 350.0, 400.0];
        let out = run(&time, &demand, &[6e-5; 4]).unwrap();
        let times: Vec<f64> = out.frames.iter().map(|f| f.time).collect();
        assert_eq!(times, time);
        assert_eq!(out.frames[2].demand, 350.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let (fan, power) = models();
        let config = StrategyConfig::default();
        let time: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let demand: Vec<f64> = time.iter().map(|t| 300.0 + 75.0 * (t / 80.0).sin()).collect();
        let k: Vec<f64> = time.iter().map(|t| 6e-5 + 6e-7 * t).collect();

        let seq = run_sim(&fan, &power, &time, &demand, &k, &config, &SimOptions { parallel: false }).unwrap();
        let par = run_sim(&fan, &power, &time, &demand, &k, &config, &SimOptions { parallel: true }).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn progress_reaches_completion() {
        let (fan, power) = models();
        let time: Vec<f64> = (0..250).map(|i| i as f64).collect();
        let demand = vec![300.0; 250];
        let k = vec![6e-5; 250];
        let mut events = Vec::new();
        let mut cb = |p: SimProgress| events.push(p);
        run_sim_with_progress(
            &fan,
            &power,
            &time,
            &demand,
            &k,
            &StrategyConfig::default(),
            &SimOptions::default(),
            Some(&mut cb),
        )
        .unwrap();

        assert!(!events.is_empty());
        assert!(events.windows(2).all(|w| w[0].step < w[1].step));
        let last = events.last().unwrap();
        assert_eq!(last.step, 250);
        assert_eq!(last.fraction_complete, 1.0);
        assert_eq!(last.sim_time_s, 249.0);
    }
}
