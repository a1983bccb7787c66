//! Validate config command implementation

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config_or_env;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// A missing file is not an error: the configuration is then built from
    /// the environment alone, exactly as `run` would.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration: {config_path}");
        println!();

        let config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Control Plane: {}", config.api.base_url);
        println!("  API Timeout: {}s", config.api.timeout_seconds);
        println!("  Storage Root: {}", config.storage.base_path.display());
        println!("  Document Export Tool: {}", config.export.mongo_tool);
        println!("  Wide-Column Export Tool: {}", config.export.cql_tool);
        match config.export.process_timeout() {
            Some(limit) => println!("  Process Timeout: {}s", limit.as_secs()),
            None => println!("  Process Timeout: none"),
        }
        match config.export.run_timeout() {
            Some(limit) => println!("  Run Timeout: {}s", limit.as_secs()),
            None => println!("  Run Timeout: none"),
        }
        println!();
        Ok(EXIT_OK)
    }
}
