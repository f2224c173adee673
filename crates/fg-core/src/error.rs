use thiserror::Error;

pub type FgResult<T> = Result<T, FgError>;

/// Numeric guard failures shared by the fangait crates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FgError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
