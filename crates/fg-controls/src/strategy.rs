//! Strategy identifiers and per-step decisions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ControlError;

/// The three compared control policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyKind {
    Fixed,
    ModeSwitch,
    Variable,
}

impl StrategyKind {
    /// All strategies in report order.
    pub const ALL: [StrategyKind; 3] = [Self::Fixed, Self::ModeSwitch, Self::Variable];

    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::ModeSwitch => "Mode-switch",
            Self::Variable => "Variable",
        }
    }

    /// Short lowercase key used on the command line and in exports.
    pub fn key(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::ModeSwitch => "mode",
            Self::Variable => "variable",
        }
    }

    /// Position in [`StrategyKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::ModeSwitch => 1,
            Self::Variable => 2,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StrategyKind {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "mode" | "mode-switch" | "modeswitch" => Ok(Self::ModeSwitch),
            "variable" | "vsd" => Ok(Self::Variable),
            _ => Err(ControlError::InvalidArg {
                what: "unknown strategy (expected fixed, mode or variable)",
            }),
        }
    }
}

/// Speed chosen by a strategy and the resulting operating state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlDecision {
    /// Commanded speed (rpm)
    pub speed: f64,
    /// Delivered airflow at the operating point (cfm)
    pub airflow: f64,
    /// Electrical power (W)
    pub power: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_keys() {
        let labels: Vec<_> = StrategyKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["Fixed", "Mode-switch", "Variable"]);
        for (i, kind) in StrategyKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(kind.key().parse::<StrategyKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("Mode-Switch".parse::<StrategyKind>().unwrap(), StrategyKind::ModeSwitch);
        assert_eq!("VSD".parse::<StrategyKind>().unwrap(), StrategyKind::Variable);
        assert!("pid".parse::<StrategyKind>().is_err());
    }
}
