//! Error types for component construction.

use thiserror::Error;

/// Errors raised when a component is built from non-physical parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;
