//! Ordered host failover
//!
//! Wide-column exports may be served by any node. Hosts are tried in the
//! configured order and the first success wins. When every host fails, all
//! attempts are kept for logging and the last one becomes the job's error.

use crate::adapters::engine::{ExportTool, ToolInvocation};
use crate::domain::BackupError;
use crate::log_host_attempt_failed;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// A failed try against one host
#[derive(Debug)]
pub struct HostAttempt {
    pub host: String,
    pub error: BackupError,
}

/// Every host failed, or there was no host to try
#[derive(Debug)]
pub struct FailoverError {
    pub target: String,
    pub sub_unit: String,
    pub attempts: Vec<HostAttempt>,
}

impl FailoverError {
    /// The error reported for the job: the one from the last host tried
    pub fn into_primary(mut self) -> BackupError {
        match self.attempts.pop() {
            Some(attempt) => attempt.error,
            None => BackupError::export(self.target, self.sub_unit, "no hosts configured"),
        }
    }
}

impl fmt::Display for FailoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "all {} host(s) failed for {}/{}",
            self.attempts.len(),
            self.target,
            self.sub_unit
        )?;
        for attempt in &self.attempts {
            write!(f, "; {}: {}", attempt.host, attempt.error)?;
        }
        Ok(())
    }
}

/// Runs the invocations in order until one succeeds
///
/// Returns the host that succeeded. Cancellation stops the sequence
/// immediately; the remaining hosts are not tried.
pub async fn run_with_failover(
    tool: &dyn ExportTool,
    target: &str,
    sub_unit: &str,
    invocations: Vec<ToolInvocation>,
    cancel: &CancellationToken,
) -> Result<String, FailoverError> {
    let total = invocations.len();
    let mut attempts = Vec::with_capacity(total);

    for (i, invocation) in invocations.into_iter().enumerate() {
        match tool.run(&invocation, cancel).await {
            Ok(()) => {
                if i > 0 {
                    tracing::info!(
                        target_name = %target,
                        sub_unit = %sub_unit,
                        host = %invocation.host,
                        attempt = i + 1,
                        "Export succeeded after failover"
                    );
                }
                return Ok(invocation.host);
            }
            Err(error) => {
                log_host_attempt_failed!(target, sub_unit, &invocation.host, &error, i + 1, total);
                let cancelled = error.is_cancelled();
                attempts.push(HostAttempt {
                    host: invocation.host,
                    error,
                });
                if cancelled {
                    break;
                }
            }
        }
    }

    Err(FailoverError {
        target: target.to_string(),
        sub_unit: sub_unit.to_string(),
        attempts,
    })
}
