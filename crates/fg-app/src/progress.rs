use fg_sim::SimProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingProject,
    CheckingCache,
    LoadingCachedResult,
    BuildingProfiles,
    Simulating,
    SavingResults,
    Completed,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub sim: Option<SimProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            sim: None,
        }
    }
}
