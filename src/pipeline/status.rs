// src/pipeline/status.rs

//! Shared pipeline status cell.
//!
//! The one piece of state shared between the control API and a running
//! pipeline. Every mutation replaces the snapshot wholesale while the
//! lock is held, so readers never observe a torn update, and reads never
//! block on an in-flight run.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{PipelineState, PipelineStatus};

/// Thread-safe holder of the current pipeline status.
#[derive(Debug)]
pub struct StatusCell {
    inner: RwLock<PipelineStatus>,
}

impl StatusCell {
    /// Create a cell in the idle state.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PipelineStatus::idle()),
        }
    }

    /// Current snapshot, cloned out under the read lock.
    pub fn snapshot(&self) -> PipelineStatus {
        self.read().clone()
    }

    /// Atomically claim the cell for a new run.
    ///
    /// Returns false without touching the snapshot when a run is already
    /// active; otherwise resets to a fresh running status with zero
    /// steps completed.
    pub fn begin_run(&self, message: impl Into<String>) -> bool {
        let mut guard = self.write();
        if guard.state == PipelineState::Running {
            return false;
        }
        *guard = PipelineStatus {
            state: PipelineState::Running,
            message: message.into(),
            steps_completed: 0,
        };
        true
    }

    /// Replace the message, keeping state and step count.
    pub fn update_message(&self, message: impl Into<String>) {
        let mut guard = self.write();
        *guard = PipelineStatus {
            state: guard.state,
            message: message.into(),
            steps_completed: guard.steps_completed,
        };
    }

    /// Record the completion of stage `step`.
    pub fn finish_step(&self, step: u8) {
        let mut guard = self.write();
        *guard = PipelineStatus {
            state: guard.state,
            message: guard.message.clone(),
            steps_completed: step,
        };
    }

    /// Mark the run finished.
    pub fn complete(&self) {
        let mut guard = self.write();
        *guard = PipelineStatus {
            state: PipelineState::Completed,
            message: "Pipeline finished successfully".to_string(),
            steps_completed: guard.steps_completed,
        };
    }

    /// Freeze the run in the error state, preserving the count of steps
    /// completed before the failure.
    pub fn fail(&self, message: impl Into<String>) {
        let mut guard = self.write();
        *guard = PipelineStatus {
            state: PipelineState::Error,
            message: message.into(),
            steps_completed: guard.steps_completed,
        };
    }

    fn read(&self) -> RwLockReadGuard<'_, PipelineStatus> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PipelineStatus> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_run_resets_snapshot() {
        let cell = StatusCell::new();
        assert!(cell.begin_run("Starting"));

        let status = cell.snapshot();
        assert_eq!(status.state, PipelineState::Running);
        assert_eq!(status.message, "Starting");
        assert_eq!(status.steps_completed, 0);
    }

    #[test]
    fn test_begin_run_rejected_while_running() {
        let cell = StatusCell::new();
        assert!(cell.begin_run("first"));
        cell.finish_step(3);

        // The rejected start must not reset progress.
        assert!(!cell.begin_run("second"));
        let status = cell.snapshot();
        assert_eq!(status.steps_completed, 3);
        assert_eq!(status.message, "first");
    }

    #[test]
    fn test_terminal_states_accept_a_new_run() {
        let cell = StatusCell::new();
        assert!(cell.begin_run("first"));
        cell.finish_step(6);
        cell.complete();
        assert!(cell.begin_run("second"));
        assert_eq!(cell.snapshot().steps_completed, 0);

        cell.fail("boom");
        assert!(cell.begin_run("third"));
    }

    #[test]
    fn test_fail_preserves_steps_completed() {
        let cell = StatusCell::new();
        cell.begin_run("run");
        cell.finish_step(2);
        cell.fail("stage 3 exploded");

        let status = cell.snapshot();
        assert_eq!(status.state, PipelineState::Error);
        assert_eq!(status.message, "stage 3 exploded");
        assert_eq!(status.steps_completed, 2);
    }

    #[test]
    fn test_steps_monotonic_within_run() {
        let cell = StatusCell::new();
        cell.begin_run("run");
        for step in 1..=6 {
            cell.finish_step(step);
            assert_eq!(cell.snapshot().steps_completed, step);
        }
        cell.complete();
        assert_eq!(cell.snapshot().steps_completed, 6);
    }
}
