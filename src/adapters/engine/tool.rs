//! External export tools
//!
//! Engine adapters never write artifacts themselves. They describe a vendor
//! tool call as a [`ToolInvocation`] and hand it to an [`ExportTool`]. The
//! production implementation, [`ProcessTool`], spawns the process; tests plug
//! in fakes that write files directly.

use crate::domain::{BackupError, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

const REDACTED: &str = "******";

/// One call of a vendor export tool
#[derive(Clone)]
pub struct ToolInvocation {
    /// Executable name or path
    pub program: String,

    /// Arguments, including credentials
    pub args: Vec<String>,

    /// Indices into `args` that must never be logged
    secret_args: Vec<usize>,

    /// Name of the target being backed up
    pub target: String,

    /// Host the call is directed at
    pub host: String,

    /// Sub-unit being exported
    pub sub_unit: String,

    /// File the tool is expected to produce
    pub destination: PathBuf,

    /// Upper bound for the process run time
    pub timeout: Option<Duration>,
}

impl ToolInvocation {
    pub fn new(
        program: impl Into<String>,
        target: impl Into<String>,
        host: impl Into<String>,
        sub_unit: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secret_args: Vec::new(),
            target: target.into(),
            host: host.into(),
            sub_unit: sub_unit.into(),
            destination: destination.into(),
            timeout: None,
        }
    }

    /// Appends a plain argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends an argument that is masked in logs
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secret_args.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Command line with secret arguments masked
    pub fn redacted_command_line(&self) -> String {
        let mut line = self.program.clone();
        for (i, arg) in self.args.iter().enumerate() {
            line.push(' ');
            if self.secret_args.contains(&i) {
                line.push_str(REDACTED);
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

impl fmt::Debug for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolInvocation")
            .field("command", &self.redacted_command_line())
            .field("target", &self.target)
            .field("host", &self.host)
            .field("sub_unit", &self.sub_unit)
            .field("destination", &self.destination)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Capability to run one export tool invocation
///
/// Success means the tool exited with status zero. Implementations must give
/// up promptly once `cancel` fires.
#[async_trait]
pub trait ExportTool: Send + Sync {
    /// Run the invocation to completion
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Export`] for spawn failures, nonzero exits and
    /// timeouts, [`BackupError::Cancelled`] on cancellation.
    async fn run(&self, invocation: &ToolInvocation, cancel: &CancellationToken) -> Result<()>;
}

/// Runs invocations as child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessTool;

impl ProcessTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExportTool for ProcessTool {
    async fn run(&self, invocation: &ToolInvocation, cancel: &CancellationToken) -> Result<()> {
        let fail = |message: String| {
            BackupError::export(
                &invocation.target,
                &invocation.sub_unit,
                format!("{message} (host {})", invocation.host),
            )
        };

        tracing::debug!(
            command = %invocation.redacted_command_line(),
            host = %invocation.host,
            "Spawning export process"
        );

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| fail(format!("failed to start {}: {e}", invocation.program)))?;

        let wait = child.wait_with_output();
        let output = match invocation.timeout {
            Some(limit) => tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(BackupError::Cancelled(format!("export of {} cancelled", invocation.sub_unit)));
                }
                res = tokio::time::timeout(limit, wait) => match res {
                    Ok(output) => output,
                    Err(_) => return Err(fail(format!("{} timed out after {limit:?}", invocation.program))),
                },
            },
            None => tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(BackupError::Cancelled(format!("export of {} cancelled", invocation.sub_unit)));
                }
                output = wait => output,
            },
        }
        .map_err(|e| fail(format!("failed to wait for {}: {e}", invocation.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(fail(format!(
                "{} exited with {}: {}",
                invocation.program, output.status, detail
            )));
        }

        Ok(())
    }
}
