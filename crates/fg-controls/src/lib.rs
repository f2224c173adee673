//! Fan-speed control strategies.
//!
//! Three policies decide a fan speed for one (demand, resistance) pair:
//!
//! - **Fixed**: one constant speed regardless of demand
//! - **Mode-switch**: the cheapest of a few discrete speeds that meets
//!   demand, or the strongest one when none does
//! - **Variable**: the continuous speed whose operating point matches demand
//!
//! Policies are pure functions of their inputs. There is no hysteresis and
//! no state carried between timesteps, so a selector can be shared across
//! threads and evaluated in any order.

pub mod config;
pub mod error;
pub mod selector;
pub mod strategy;

pub use config::StrategyConfig;
pub use error::{ControlError, ControlResult};
pub use selector::StrategySelector;
pub use strategy::{ControlDecision, StrategyKind};
