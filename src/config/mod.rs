//! Configuration management for dbkeeper.
//!
//! dbkeeper reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DBKEEPER_*` environment overrides
//! - The legacy `API_HOST` and `BACKUP_BASE_PATH` variables
//! - Validation before anything touches the network or the disk
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "http://backup-api:8080"
//! timeout_seconds = 30
//!
//! [storage]
//! base_path = "/var/backups"
//!
//! [export]
//! mongo_tool = "mongoexport"
//! cql_tool = "cqlsh"
//! process_timeout_secs = 3600
//! run_timeout_secs = 0
//!
//! [logging]
//! local_enabled = true
//! local_path = "/var/log/dbkeeper"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_from_env, load_config_or_env};
pub use schema::{ApiConfig, ApplicationConfig, ExportConfig, KeeperConfig, LoggingConfig, StorageConfig};
pub use secret::{secret_string, SecretString, SecretValue};
