//! Error types for the fg-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI one error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Model construction failed: {0}")]
    Model(String),

    #[error("Invalid strategy configuration: {0}")]
    Control(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Demand CSV {path}, line {line}: {message}")]
    Csv {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fg-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<fg_project::ProjectError> for AppError {
    fn from(err: fg_project::ProjectError) -> Self {
        match err {
            fg_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<fg_project::ValidationError> for AppError {
    fn from(err: fg_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<fg_components::ComponentError> for AppError {
    fn from(err: fg_components::ComponentError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<fg_controls::ControlError> for AppError {
    fn from(err: fg_controls::ControlError) -> Self {
        AppError::Control(err.to_string())
    }
}

impl From<fg_sim::SimError> for AppError {
    fn from(err: fg_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<fg_results::ResultsError> for AppError {
    fn from(err: fg_results::ResultsError) -> Self {
        match err {
            fg_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Results(err.to_string())
    }
}
