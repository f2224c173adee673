//! Per-step speed selection for the three strategies.

use crate::config::StrategyConfig;
use crate::error::ControlResult;
use crate::strategy::{ControlDecision, StrategyKind};
use fg_components::{FanModel, PowerModel};
use fg_solver::{find_operating_point, find_speed_for_target};
use tracing::trace;

/// Evaluates the strategies against one fan and power model.
///
/// Holds only shared references and a validated configuration, so one
/// selector serves every timestep of a run.
pub struct StrategySelector<'a> {
    fan: &'a dyn FanModel,
    power: &'a dyn PowerModel,
    config: &'a StrategyConfig,
}

impl<'a> StrategySelector<'a> {
    /// Build a selector.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid.
    pub fn new(
        fan: &'a dyn FanModel,
        power: &'a dyn PowerModel,
        config: &'a StrategyConfig,
    ) -> ControlResult<Self> {
        config.validate()?;
        Ok(Self { fan, power, config })
    }

    pub fn config(&self) -> &StrategyConfig {
        self.config
    }

    /// Operating state at an explicit speed.
    pub fn evaluate(&self, speed: f64, k: f64) -> ControlDecision {
        let airflow = find_operating_point(self.fan, k, speed, &self.config.grid()).airflow;
        ControlDecision {
            speed,
            airflow,
            power: self.power.power_at(self.fan, airflow, speed),
        }
    }

    /// Fixed speed, independent of demand.
    pub fn fixed(&self, k: f64) -> ControlDecision {
        self.evaluate(self.config.fixed_speed_rpm, k)
    }

    /// Cheapest allowed speed delivering at least `demand − tol`.
    ///
    /// Exact power ties keep the speed listed first. When no speed is
    /// feasible the one with the most airflow is returned regardless of
    /// power, again first on ties.
    pub fn mode_switch(&self, demand: f64, k: f64) -> ControlDecision {
        let threshold = demand - self.config.tolerance_cfm;

        let mut cheapest: Option<ControlDecision> = None;
        let mut strongest: Option<ControlDecision> = None;

        for &speed in &self.config.mode_speeds_rpm {
            let candidate = self.evaluate(speed, k);
            if candidate.airflow >= threshold
                && cheapest.is_none_or(|best| candidate.power < best.power)
            {
                cheapest = Some(candidate);
            }
            if strongest.is_none_or(|best| candidate.airflow > best.airflow) {
                strongest = Some(candidate);
            }
        }

        match (cheapest, strongest) {
            (Some(decision), _) => decision,
            (None, Some(decision)) => {
                trace!(demand, k, airflow = decision.airflow, "no mode speed meets demand");
                decision
            }
            // validated configuration has at least one mode speed
            (None, None) => self.evaluate(0.0, k),
        }
    }

    /// Continuous speed matching demand within the configured bounds.
    pub fn variable(&self, demand: f64, k: f64) -> ControlDecision {
        let (lo, hi) = self.config.speed_bounds_rpm;
        let solution = find_speed_for_target(self.fan, k, demand, lo, hi, &self.config.speed_solver());
        ControlDecision {
            speed: solution.speed,
            airflow: solution.airflow,
            power: self.power.power_at(self.fan, solution.airflow, solution.speed),
        }
    }

    pub fn decide(&self, kind: StrategyKind, demand: f64, k: f64) -> ControlDecision {
        match kind {
            StrategyKind::Fixed => self.fixed(k),
            StrategyKind::ModeSwitch => self.mode_switch(demand, k),
            StrategyKind::Variable => self.variable(demand, k),
        }
    }

    /// All strategies in [`StrategyKind::ALL`] order.
    pub fn decide_all(&self, demand: f64, k: f64) -> [ControlDecision; 3] {
        StrategyKind::ALL.map(|kind| self.decide(kind, demand, k))
    }
}
