//! Content-based hashing for run IDs.

use fg_project::schema::Project;
use sha2::{Digest, Sha256};

/// SHA-256 over the project, any external demand data it references, and
/// the solver version.
///
/// Two runs share an id exactly when they would produce the same frames.
pub fn compute_run_id(project: &Project, demand_data: Option<&str>, solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let project_json = serde_json::to_string(project).unwrap_or_default();
    hasher.update(project_json.as_bytes());

    if let Some(data) = demand_data {
        hasher.update(data.as_bytes());
    }

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stability() {
        let project = Project::demo();
        let hash1 = compute_run_id(&project, None, "v1");
        let hash2 = compute_run_id(&project, None, "v1");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let project = Project::demo();
        let mut other = Project::demo();
        other.strategies.fixed_speed_rpm = 950.0;

        let base = compute_run_id(&project, None, "v1");
        assert_ne!(base, compute_run_id(&other, None, "v1"));
        assert_ne!(base, compute_run_id(&project, None, "v2"));
        assert_ne!(base, compute_run_id(&project, Some("time_s,airflow_demand_cfm\n"), "v1"));
    }
}
