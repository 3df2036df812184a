use crate::types::Stage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("Stage {attempted} started out of order (expected {expected:?})")]
    OutOfOrder {
        attempted: Stage,
        expected: Option<Stage>,
    },
    #[error("Stage {0} is still in progress")]
    Busy(Stage),
    #[error("No stage in progress")]
    NotStarted,
}

/// Tracks which launch stage is running and which have finished.
///
/// `completed` is always a prefix of [`Stage::ALL`], and `current`, when set,
/// is the stage right after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageProgress {
    current: Option<Stage>,
    completed: Vec<Stage>,
}

impl StageProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Stage> {
        self.current
    }

    pub fn completed(&self) -> &[Stage] {
        &self.completed
    }

    pub fn next_stage(&self) -> Option<Stage> {
        Stage::ALL.get(self.completed.len()).copied()
    }

    pub fn begin(&mut self, stage: Stage) -> Result<(), ProgressError> {
        if let Some(current) = self.current {
            return Err(ProgressError::Busy(current));
        }

        let expected = self.next_stage();
        if expected != Some(stage) {
            return Err(ProgressError::OutOfOrder {
                attempted: stage,
                expected,
            });
        }

        self.current = Some(stage);
        Ok(())
    }

    pub fn complete(&mut self) -> Result<Stage, ProgressError> {
        let stage = self.current.take().ok_or(ProgressError::NotStarted)?;
        self.completed.push(stage);
        Ok(stage)
    }

    /// Stops the running stage without completing it.
    pub fn halt(&mut self) -> Option<Stage> {
        self.current.take()
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.completed.clear();
    }

    pub fn is_complete(&self) -> bool {
        self.completed.len() == Stage::ALL.len()
    }

    pub fn progress(&self) -> f32 {
        self.completed.len() as f32 / Stage::ALL.len() as f32
    }
}
