//! Run storage API.
//!
//! Each run lives in its own directory named by run id:
//!
//! ```text
//! <root>/<run id>/manifest.json
//! <root>/<run id>/frames.jsonl     one SimulationFrame per line
//! <root>/<run id>/metrics.json     AggregateMetrics per strategy
//! ```

use crate::types::{AggregateMetrics, RunManifest, SimulationFrame};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const FRAMES_FILE: &str = "frames.jsonl";
const METRICS_FILE: &str = "metrics.json";

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store under `.fangait/runs` next to the project file.
    pub fn for_project(project_path: &Path) -> ResultsResult<Self> {
        let project_dir = project_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "project path has no parent directory".to_string(),
            })?;
        let runs_dir = project_dir.join(".fangait").join("runs");
        Self::new(runs_dir)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        let dir = self.run_dir(run_id);
        [MANIFEST_FILE, FRAMES_FILE, METRICS_FILE]
            .iter()
            .all(|f| dir.join(f).exists())
    }

    pub fn save_run(
        &self,
        manifest: &RunManifest,
        frames: &[SimulationFrame],
        metrics: &[AggregateMetrics],
    ) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let mut frames_content = String::new();
        for frame in frames {
            let line = serde_json::to_string(frame)?;
            frames_content.push_str(&line);
            frames_content.push('\n');
        }
        fs::write(run_dir.join(FRAMES_FILE), frames_content)?;

        let metrics_json = serde_json::to_string_pretty(metrics)?;
        fs::write(run_dir.join(METRICS_FILE), metrics_json)?;

        // manifest last: its presence marks a complete run
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        Ok(())
    }

    fn existing_file(&self, run_id: &str, name: &str) -> ResultsResult<PathBuf> {
        let path = self.run_dir(run_id).join(name);
        if path.exists() {
            Ok(path)
        } else {
            Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            })
        }
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let content = fs::read_to_string(self.existing_file(run_id, MANIFEST_FILE)?)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_frames(&self, run_id: &str) -> ResultsResult<Vec<SimulationFrame>> {
        let content = fs::read_to_string(self.existing_file(run_id, FRAMES_FILE)?)?;
        let mut frames = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                frames.push(serde_json::from_str(line)?);
            }
        }
        Ok(frames)
    }

    pub fn load_metrics(&self, run_id: &str) -> ResultsResult<Vec<AggregateMetrics>> {
        let content = fs::read_to_string(self.existing_file(run_id, METRICS_FILE)?)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Manifests of every stored run, newest first.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id) {
                    runs.push(manifest);
                }
            }
        }

        runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
