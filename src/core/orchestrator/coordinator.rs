//! Backup run coordinator
//!
//! One run fans out twice: an outer task per target and, inside each, an
//! inner task per sub-unit. Every successful inner task sends its record
//! into one bounded channel. A single consumer drains that channel and hands
//! each record to the reporter while the jobs are still running.
//!
//! The channel closes only after the outer join set has joined every target
//! task, and each target task joins its own inner set before returning. The
//! consumer therefore sees every record before the channel reports closed.

use super::job::{JobState, SubUnitJob};
use super::summary::{JobFailure, RunSummary, TargetOutcome};
use crate::adapters::api::Reporter;
use crate::adapters::engine::{AdapterRegistry, TargetSession};
use crate::domain::{Backup, BackupError, Result, Target};
use crate::log_job_failure;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Records in flight between exporters and the consumer
const CHANNEL_CAPACITY: usize = 1;

/// A successful export waiting to be reported
#[derive(Debug)]
struct FinishedJob {
    job: SubUnitJob,
    backup: Backup,
}

/// Runs all targets and reports every produced artifact
///
/// # Example
///
/// ```no_run
/// use dbkeeper::adapters::api::{ApiClient, TargetCatalog};
/// use dbkeeper::adapters::engine::AdapterRegistry;
/// use dbkeeper::config::load_config;
/// use dbkeeper::core::orchestrator::Orchestrator;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("dbkeeper.toml")?;
/// let api = Arc::new(ApiClient::new(&config.api)?);
/// let targets = api.load_targets().await?;
///
/// let orchestrator = Orchestrator::new(AdapterRegistry::from_config(&config), api);
/// let summary = orchestrator.run_all(targets, &CancellationToken::new()).await;
/// summary.log_summary();
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator {
    registry: Arc<AdapterRegistry>,
    reporter: Arc<dyn Reporter>,
}

impl Orchestrator {
    pub fn new(registry: AdapterRegistry, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            registry: Arc::new(registry),
            reporter,
        }
    }

    /// Backs up every target and returns once all records are reported
    ///
    /// Failures never abort the run: a target-level failure ends that target
    /// only, a sub-unit failure ends that sub-unit only, and a reporter
    /// failure affects only the record being reported.
    pub async fn run_all(&self, targets: Vec<Target>, cancel: &CancellationToken) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new(targets.len());

        tracing::info!(targets = targets.len(), "Starting backup run");

        let (tx, mut rx) = mpsc::channel::<FinishedJob>(CHANNEL_CAPACITY);
        let driver = tokio::spawn(drive_targets(
            self.registry.clone(),
            targets,
            tx,
            cancel.clone(),
        ));

        while let Some(finished) = rx.recv().await {
            self.report(finished, &mut summary).await;
        }

        match driver.await {
            Ok((outcomes, panicked)) => {
                for outcome in outcomes {
                    summary.add_outcome(outcome);
                }
                summary.targets_failed += panicked;
            }
            Err(e) => {
                tracing::error!(error = %e, "Target driver task failed");
                summary.targets_failed = summary.targets_total;
            }
        }

        summary.cancelled = cancel.is_cancelled();
        summary.duration = started.elapsed();
        summary
    }

    async fn report(&self, mut finished: FinishedJob, summary: &mut RunSummary) {
        let backup = &finished.backup;
        match self.reporter.report(backup).await {
            Ok(()) => {
                summary.reported += 1;
                if let Err(e) = finished.job.advance(JobState::Reported) {
                    tracing::warn!(error = %e, "Unexpected job state after report");
                }
                tracing::info!(
                    target_name = %backup.target_name(),
                    sub_unit = %finished.job.sub_unit,
                    backup_id = %backup.id,
                    size = backup.size,
                    path = %backup.path.display(),
                    "Backup reported"
                );
            }
            Err(e) => {
                summary.report_failures += 1;
                tracing::error!(
                    target_name = %backup.target_name(),
                    sub_unit = %finished.job.sub_unit,
                    backup_id = %backup.id,
                    error = %e,
                    "Failed to report backup"
                );
            }
        }
    }
}

/// Outer fan-out: one task per target
///
/// Holds its sender until every target task has joined, then drops it,
/// which closes the channel.
async fn drive_targets(
    registry: Arc<AdapterRegistry>,
    targets: Vec<Target>,
    tx: mpsc::Sender<FinishedJob>,
    cancel: CancellationToken,
) -> (Vec<TargetOutcome>, usize) {
    let mut set = JoinSet::new();
    for target in targets {
        set.spawn(run_target(
            registry.clone(),
            target,
            tx.clone(),
            cancel.clone(),
        ));
    }

    let mut outcomes = Vec::with_capacity(set.len());
    let mut panicked = 0;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                panicked += 1;
                tracing::error!(error = %e, "Target task failed");
            }
        }
    }

    drop(tx);
    (outcomes, panicked)
}

/// Opens the target's session and enumerates its sub-units
async fn open_target(
    registry: &AdapterRegistry,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<(Arc<dyn TargetSession>, Vec<String>)> {
    if cancel.is_cancelled() {
        return Err(BackupError::Cancelled(format!(
            "target '{}' not started",
            target.name
        )));
    }

    let adapter = registry.adapter_for(target.kind)?;
    let session = adapter.connect(target, cancel).await?;
    let sub_units = session.list_sub_units(cancel).await?;
    Ok((session, sub_units))
}

/// Inner fan-out: one task per sub-unit of `target`
async fn run_target(
    registry: Arc<AdapterRegistry>,
    target: Target,
    tx: mpsc::Sender<FinishedJob>,
    cancel: CancellationToken,
) -> TargetOutcome {
    let (session, sub_units) = match open_target(&registry, &target, &cancel).await {
        Ok(opened) => opened,
        Err(e) => {
            if e.is_cancelled() {
                tracing::warn!(target_name = %target.name, error = %e, "Target skipped");
            } else {
                tracing::error!(
                    target_name = %target.name,
                    kind = %target.kind,
                    error = %e,
                    "Target backup aborted"
                );
            }
            return TargetOutcome::aborted(&target.name, e);
        }
    };

    tracing::info!(
        target_name = %target.name,
        kind = %target.kind,
        sub_units = sub_units.len(),
        "Backing up target"
    );

    let mut outcome = TargetOutcome::new(&target.name);
    outcome.sub_units = sub_units.len();

    let mut jobs = JoinSet::new();
    for sub_unit in sub_units {
        jobs.spawn(run_sub_unit(
            session.clone(),
            sub_unit,
            tx.clone(),
            cancel.clone(),
        ));
    }
    drop(tx);

    while let Some(joined) = jobs.join_next().await {
        match joined {
            Ok(Ok(())) => outcome.succeeded += 1,
            Ok(Err(failure)) => {
                outcome.failed += 1;
                outcome.job_failures.push(failure);
            }
            Err(e) => {
                outcome.failed += 1;
                tracing::error!(target_name = %target.name, error = %e, "Sub-unit task failed");
            }
        }
    }

    tracing::info!(
        target_name = %target.name,
        succeeded = outcome.succeeded,
        failed = outcome.failed,
        "Target finished"
    );
    outcome
}

async fn export(
    session: &dyn TargetSession,
    job: &mut SubUnitJob,
    cancel: &CancellationToken,
) -> Result<Backup> {
    job.advance(JobState::Exporting)?;
    let backup = session.export_sub_unit(&job.sub_unit, cancel).await?;
    job.advance(JobState::Succeeded)?;
    Ok(backup)
}

/// Exports one sub-unit and forwards its record
async fn run_sub_unit(
    session: Arc<dyn TargetSession>,
    sub_unit: String,
    tx: mpsc::Sender<FinishedJob>,
    cancel: CancellationToken,
) -> std::result::Result<(), JobFailure> {
    let mut job = SubUnitJob::new(&session.target().name, sub_unit);

    match export(session.as_ref(), &mut job, &cancel).await {
        Ok(backup) => {
            if tx.send(FinishedJob { job, backup }).await.is_err() {
                tracing::error!("Record channel closed before all jobs finished");
            }
            Ok(())
        }
        Err(error) => {
            job.fail();
            log_job_failure!(job.target, job.sub_unit, error);
            Err(JobFailure {
                target: job.target,
                sub_unit: job.sub_unit,
                error,
            })
        }
    }
}
