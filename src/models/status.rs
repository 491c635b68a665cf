//! Observable pipeline progress snapshot.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the pipeline.
///
/// `Completed` and `Error` are terminal for a run but both accept a new
/// start; there is no separate resetting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Idle,
    Running,
    Completed,
    Error,
}

/// Progress snapshot for the current or most recent run.
///
/// Readers always receive a wholesale copy; the record is never mutated
/// field-by-field where an observer could see a torn update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineStatus {
    #[serde(rename = "status")]
    pub state: PipelineState,

    /// Human-readable description of the current stage or failure
    pub message: String,

    /// Count of stages finished in this run, 0..=6
    pub steps_completed: u8,
}

impl PipelineStatus {
    /// Status at process start and between runs.
    pub fn idle() -> Self {
        Self {
            state: PipelineState::Idle,
            message: "Ready".to_string(),
            steps_completed: 0,
        }
    }
}

impl Default for PipelineStatus {
    fn default() -> Self {
        Self::idle()
    }
}
