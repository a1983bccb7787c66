//! Sub-unit job lifecycle
//!
//! ```text
//! Pending -> Exporting -> Succeeded -> Reported
//!     \          \
//!      +----------+-----> Failed
//! ```
//!
//! `Failed` and `Reported` are terminal. A job is never retried.

use crate::domain::{BackupError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Exporting,
    Succeeded,
    Failed,
    Reported,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Failed | JobState::Reported)
    }

    pub fn can_transition_to(self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Pending, Exporting)
                | (Pending, Failed)
                | (Exporting, Succeeded)
                | (Exporting, Failed)
                | (Succeeded, Reported)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Exporting => "exporting",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
            JobState::Reported => "reported",
        };
        f.write_str(s)
    }
}

/// Export of one sub-unit of one target
#[derive(Debug, Clone)]
pub struct SubUnitJob {
    pub target: String,
    pub sub_unit: String,
    state: JobState,
}

impl SubUnitJob {
    pub fn new(target: impl Into<String>, sub_unit: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            sub_unit: sub_unit.into(),
            state: JobState::Pending,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Moves the job to `next`
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Other`] for a transition the lifecycle does not
    /// allow; the state is left unchanged.
    pub fn advance(&mut self, next: JobState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(BackupError::Other(format!(
                "invalid job transition {} -> {} for {}/{}",
                self.state, next, self.target, self.sub_unit
            )));
        }

        tracing::trace!(
            target_name = %self.target,
            sub_unit = %self.sub_unit,
            from = %self.state,
            to = %next,
            "Job state change"
        );
        self.state = next;
        Ok(())
    }

    /// Marks the job failed unless it already reached a terminal state
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = JobState::Failed;
        }
    }
}
