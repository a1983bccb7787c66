//! Configuration schema types
//!
//! This module defines the configuration structure for dbkeeper.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main dbkeeper configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeeperConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Control plane (target catalog and backup reports)
    #[serde(default)]
    pub api: ApiConfig,

    /// Artifact storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Export tool and timeout settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KeeperConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.storage.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Control plane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the control plane, e.g. `http://backup-api:8080`
    #[serde(default)]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_api_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("api.base_url cannot be empty (set it or API_HOST)".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("api.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: default_api_timeout_seconds(),
        }
    }
}

/// Artifact storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory below which all artifacts are written
    #[serde(default)]
    pub base_path: PathBuf,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_path.as_os_str().is_empty() {
            return Err(
                "storage.base_path cannot be empty (set it or BACKUP_BASE_PATH)".to_string(),
            );
        }

        if !self.base_path.is_absolute() {
            return Err(format!(
                "storage.base_path must be an absolute path, got '{}'",
                self.base_path.display()
            ));
        }

        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Document store export tool
    #[serde(default = "default_mongo_tool")]
    pub mongo_tool: String,

    /// Wide-column store shell used for `COPY ... TO`
    #[serde(default = "default_cql_tool")]
    pub cql_tool: String,

    /// Timeout for a single export process in seconds (0 = no timeout)
    #[serde(default)]
    pub process_timeout_secs: u64,

    /// Timeout for enumeration connections and session setup in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Deadline for the whole run in seconds (0 = unbounded)
    #[serde(default)]
    pub run_timeout_secs: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.mongo_tool.trim().is_empty() {
            return Err("export.mongo_tool cannot be empty".to_string());
        }

        if self.cql_tool.trim().is_empty() {
            return Err("export.cql_tool cannot be empty".to_string());
        }

        if self.connect_timeout_secs == 0 {
            return Err("export.connect_timeout_secs must be > 0".to_string());
        }

        Ok(())
    }

    /// Per-process timeout, `None` when disabled
    pub fn process_timeout(&self) -> Option<Duration> {
        (self.process_timeout_secs > 0).then(|| Duration::from_secs(self.process_timeout_secs))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Run deadline, `None` when unbounded
    pub fn run_timeout(&self) -> Option<Duration> {
        (self.run_timeout_secs > 0).then(|| Duration::from_secs(self.run_timeout_secs))
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mongo_tool: default_mongo_tool(),
            cql_tool: default_cql_tool(),
            process_timeout_secs: 0,
            connect_timeout_secs: default_connect_timeout_secs(),
            run_timeout_secs: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".into());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_timeout_seconds() -> u64 {
    30
}

fn default_mongo_tool() -> String {
    "mongoexport".to_string()
}

fn default_cql_tool() -> String {
    "cqlsh".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_local_path() -> String {
    "/var/log/dbkeeper".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
