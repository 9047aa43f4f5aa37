pub mod commands;
pub mod orchestration;

pub use commands::{run_bump, run_check, run_release, Workspace};
pub use orchestration::{
    apply_bump, BumpOutcome, ReleaseFailure, ReleaseOptions, ReleaseOrchestrator, ReleaseReport,
    StageRecord, StageStatus,
};
