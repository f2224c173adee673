//! fg-project: project file format and validation.
//!
//! A project is one fan, one duct, the strategy settings and a demand
//! source. Files are YAML by default; `.json` paths are read and written as
//! JSON. Every load and save validates.

use std::path::Path;

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_project};

/// Newest project file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_validated(
    path: &Path,
    parse: impl FnOnce(&str) -> ProjectResult<Project>,
) -> ProjectResult<Project> {
    let project = parse(&std::fs::read_to_string(path)?)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Project> {
    read_validated(path, |text| Ok(serde_yaml::from_str(text)?))
}

pub fn load_json(path: &Path) -> ProjectResult<Project> {
    read_validated(path, |text| Ok(serde_json::from_str(text)?))
}

pub fn save_yaml(path: &Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    std::fs::write(path, serde_yaml::to_string(project)?)?;
    Ok(())
}

pub fn save_json(path: &Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    std::fs::write(path, serde_json::to_string_pretty(project)?)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load_project(path: &Path) -> ProjectResult<Project> {
    if is_json(path) { load_json(path) } else { load_yaml(path) }
}

/// Save by extension, mirroring [`load_project`].
pub fn save_project(path: &Path, project: &Project) -> ProjectResult<()> {
    if is_json(path) {
        save_json(path, project)
    } else {
        save_yaml(path, project)
    }
}
