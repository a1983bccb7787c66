//! Run summary and per-target outcomes

use crate::domain::BackupError;
use std::time::Duration;

/// Result of the outer job of one target
#[derive(Debug)]
pub struct TargetOutcome {
    pub target: String,

    /// Sub-units enumerated; zero when enumeration failed
    pub sub_units: usize,

    pub succeeded: usize,

    pub failed: usize,

    /// Failed sub-unit jobs, with the error that ended each
    pub job_failures: Vec<JobFailure>,

    /// Target-level failure (unsupported kind, connection, enumeration)
    pub error: Option<BackupError>,
}

impl TargetOutcome {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            sub_units: 0,
            succeeded: 0,
            failed: 0,
            job_failures: Vec::new(),
            error: None,
        }
    }

    pub fn aborted(target: impl Into<String>, error: BackupError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(target)
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.error.is_some()
    }
}

/// A sub-unit job that ended without an artifact
#[derive(Debug, Clone)]
pub struct JobFailure {
    pub target: String,
    pub sub_unit: String,
    pub error: BackupError,
}

/// A target that could not be processed
#[derive(Debug, Clone)]
pub struct TargetFailure {
    pub target: String,
    pub message: String,
}

/// Summary of one orchestration run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub targets_total: usize,

    /// Targets aborted before or during enumeration
    pub targets_failed: usize,

    pub jobs_succeeded: usize,

    pub jobs_failed: usize,

    /// Records accepted by the reporter
    pub reported: usize,

    /// Records the reporter rejected
    pub report_failures: usize,

    /// Whether the run was cancelled before it finished
    pub cancelled: bool,

    pub duration: Duration,

    pub failures: Vec<TargetFailure>,

    pub job_failures: Vec<JobFailure>,
}

impl RunSummary {
    pub fn new(targets_total: usize) -> Self {
        Self {
            targets_total,
            ..Default::default()
        }
    }

    /// Folds the outcome of one target into the totals
    pub fn add_outcome(&mut self, outcome: TargetOutcome) {
        self.jobs_succeeded += outcome.succeeded;
        self.jobs_failed += outcome.failed;
        self.job_failures.extend(outcome.job_failures);
        if let Some(error) = outcome.error {
            self.targets_failed += 1;
            self.failures.push(TargetFailure {
                target: outcome.target,
                message: error.to_string(),
            });
        }
    }

    /// True when every target was processed and every record delivered
    pub fn is_successful(&self) -> bool {
        !self.cancelled
            && self.targets_failed == 0
            && self.jobs_failed == 0
            && self.report_failures == 0
    }

    pub fn log_summary(&self) {
        tracing::info!(
            targets = self.targets_total,
            targets_failed = self.targets_failed,
            jobs_succeeded = self.jobs_succeeded,
            jobs_failed = self.jobs_failed,
            reported = self.reported,
            report_failures = self.report_failures,
            cancelled = self.cancelled,
            duration_secs = self.duration.as_secs(),
            "Backup run completed"
        );

        for failure in &self.failures {
            tracing::warn!(
                target_name = %failure.target,
                message = %failure.message,
                "Target not backed up"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_outcomes() {
        let mut summary = RunSummary::new(2);

        let mut ok = TargetOutcome::new("shop");
        ok.sub_units = 3;
        ok.succeeded = 2;
        ok.failed = 1;
        ok.job_failures.push(JobFailure {
            target: "shop".to_string(),
            sub_unit: "orders".to_string(),
            error: BackupError::export("shop", "orders", "exit status: 1"),
        });
        summary.add_outcome(ok);
        summary.add_outcome(TargetOutcome::aborted(
            "billing",
            BackupError::NotImplemented("mysql".to_string()),
        ));

        assert_eq!(summary.jobs_succeeded, 2);
        assert_eq!(summary.jobs_failed, 1);
        assert_eq!(summary.targets_failed, 1);
        assert_eq!(summary.failures[0].target, "billing");
        assert_eq!(summary.job_failures.len(), 1);
        assert!(matches!(
            summary.job_failures[0].error,
            BackupError::Export { .. }
        ));
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_empty_run_is_successful() {
        assert!(RunSummary::new(0).is_successful());
    }

    #[test]
    fn test_report_failures_are_not_successful() {
        let mut summary = RunSummary::new(1);
        summary.report_failures = 1;
        assert!(!summary.is_successful());
    }
}
