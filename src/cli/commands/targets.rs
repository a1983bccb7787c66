//! Targets command implementation
//!
//! Shows what the next run would back up. Credentials are never printed.

use super::{EXIT_CATALOG, EXIT_CONFIG, EXIT_OK};
use crate::adapters::api::{ApiClient, TargetCatalog};
use crate::config::KeeperConfig;
use crate::domain::RedactedTarget;
use clap::Args;

/// Arguments for the targets command
#[derive(Args, Debug, Default)]
pub struct TargetsArgs {
    /// Print the redacted targets as JSON
    #[arg(long)]
    pub json: bool,
}

impl TargetsArgs {
    /// Execute the targets command
    pub async fn execute(&self, config: &KeeperConfig) -> anyhow::Result<i32> {
        let api = match ApiClient::new(&config.api) {
            Ok(client) => client,
            Err(e) => {
                eprintln!("Failed to create control plane client: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let targets = match api.load_targets().await {
            Ok(targets) => targets,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load targets");
                eprintln!("Failed to load targets: {e}");
                return Ok(EXIT_CATALOG);
            }
        };

        let redacted: Vec<RedactedTarget> = targets.iter().map(|t| t.redacted()).collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&redacted)?);
            return Ok(EXIT_OK);
        }

        if redacted.is_empty() {
            println!("No targets with pending backups.");
            return Ok(EXIT_OK);
        }

        println!("{} target(s) with pending backups:", redacted.len());
        for target in &redacted {
            println!(
                "  {:<24} {:<10} {}:{}  db={}",
                target.name, target.kind, target.address, target.port, target.database
            );
        }
        Ok(EXIT_OK)
    }
}
