//! Run command implementation
//!
//! Loads the due targets from the control plane, backs them up and reports
//! every artifact.

use super::{EXIT_CATALOG, EXIT_CONFIG, EXIT_INTERRUPTED, EXIT_OK, EXIT_PARTIAL};
use crate::adapters::api::{ApiClient, TargetCatalog};
use crate::adapters::engine::AdapterRegistry;
use crate::config::KeeperConfig;
use crate::core::orchestrator::{Orchestrator, RunSummary};
use crate::domain::Target;
use clap::Args;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Only back up the named target (repeatable)
    #[arg(long = "target", value_name = "NAME")]
    pub targets: Vec<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config: &KeeperConfig, cancel: CancellationToken) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let api = match ApiClient::new(&config.api) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create control plane client");
                eprintln!("Failed to create control plane client: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let targets = match api.load_targets().await {
            Ok(targets) => self.select(targets),
            Err(e) => {
                tracing::error!(error = %e, url = %api.base_url(), "Failed to load targets");
                eprintln!("Failed to load targets: {e}");
                return Ok(EXIT_CATALOG);
            }
        };

        if targets.is_empty() {
            tracing::info!("No targets with pending backups");
            println!("Nothing to back up.");
            return Ok(EXIT_OK);
        }

        if let Some(limit) = config.export.run_timeout() {
            let deadline = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => {
                        tracing::warn!(limit_secs = limit.as_secs(), "Run deadline reached, cancelling");
                        deadline.cancel();
                    }
                    _ = deadline.cancelled() => {}
                }
            });
        }

        println!("Backing up {} target(s)...", targets.len());

        let orchestrator = Orchestrator::new(AdapterRegistry::from_config(config), api);
        let summary = orchestrator.run_all(targets, &cancel).await;
        summary.log_summary();
        print_summary(&summary);

        Ok(exit_code(&summary))
    }

    /// Applies the `--target` filter
    fn select(&self, targets: Vec<Target>) -> Vec<Target> {
        if self.targets.is_empty() {
            return targets;
        }
        targets
            .into_iter()
            .filter(|t| self.targets.iter().any(|name| name == &t.name))
            .collect()
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Backup Summary:");
    println!("  Targets: {}", summary.targets_total);
    println!("  Targets failed: {}", summary.targets_failed);
    println!("  Exports succeeded: {}", summary.jobs_succeeded);
    println!("  Exports failed: {}", summary.jobs_failed);
    println!("  Reported: {}", summary.reported);
    println!("  Report failures: {}", summary.report_failures);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    for failure in &summary.failures {
        println!("  - {}: {}", failure.target, failure.message);
    }
    for failure in &summary.job_failures {
        println!("  - {}/{}: {}", failure.target, failure.sub_unit, failure.error);
    }
    println!();
}

fn exit_code(summary: &RunSummary) -> i32 {
    if summary.cancelled {
        println!("Run interrupted.");
        EXIT_INTERRUPTED
    } else if summary.is_successful() {
        println!("Backup completed successfully.");
        EXIT_OK
    } else {
        println!("Backup completed with failures.");
        EXIT_PARTIAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TargetKind;

    fn target(name: &str) -> Target {
        Target::builder()
            .name(name)
            .kind(TargetKind::Mongo)
            .address("localhost")
            .build()
            .unwrap()
    }

    #[test]
    fn test_select_without_filter_keeps_all() {
        let args = RunArgs::default();
        assert_eq!(args.select(vec![target("a"), target("b")]).len(), 2);
    }

    #[test]
    fn test_select_with_filter() {
        let args = RunArgs {
            targets: vec!["b".to_string()],
        };
        let selected = args.select(vec![target("a"), target("b")]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "b");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&RunSummary::new(0)), EXIT_OK);

        let mut partial = RunSummary::new(1);
        partial.jobs_failed = 1;
        assert_eq!(exit_code(&partial), EXIT_PARTIAL);

        let mut interrupted = RunSummary::new(1);
        interrupted.cancelled = true;
        assert_eq!(exit_code(&interrupted), EXIT_INTERRUPTED);
    }
}
