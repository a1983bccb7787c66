//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::KeeperConfig;
use crate::domain::errors::BackupError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into KeeperConfig
/// 4. Applies environment variable overrides (DBKEEPER_* prefix, then legacy names)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use dbkeeper::config::loader::load_config;
///
/// let config = load_config("dbkeeper.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<KeeperConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BackupError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BackupError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: KeeperConfig = toml::from_str(&contents)
        .map_err(|e| BackupError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);
    validate(config)
}

/// Builds configuration from defaults and the environment only
///
/// Used when the agent runs without a configuration file, e.g. as a cron
/// container that only gets `API_HOST` and `BACKUP_BASE_PATH`.
///
/// # Errors
///
/// Returns an error if the resulting configuration is invalid.
pub fn load_config_from_env() -> Result<KeeperConfig> {
    let mut config = KeeperConfig::default();
    apply_env_overrides(&mut config);
    validate(config)
}

/// Loads `path` if it exists, otherwise falls back to [`load_config_from_env`]
pub fn load_config_or_env(path: impl AsRef<Path>) -> Result<KeeperConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(
            path = %path.display(),
            "Configuration file not found, using environment only"
        );
        load_config_from_env()
    }
}

fn validate(config: KeeperConfig) -> Result<KeeperConfig> {
    config.validate().map_err(|e| {
        BackupError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BackupError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BackupError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// `DBKEEPER_<SECTION>_<KEY>` variables win. The legacy `API_HOST` and
/// `BACKUP_BASE_PATH` variables only fill values that are still empty.
fn apply_env_overrides(config: &mut KeeperConfig) {
    if let Ok(val) = std::env::var("DBKEEPER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("DBKEEPER_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("DBKEEPER_API_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.api.timeout_seconds = secs;
        }
    }
    if config.api.base_url.is_empty() {
        if let Ok(val) = std::env::var("API_HOST") {
            config.api.base_url = val;
        }
    }

    if let Ok(val) = std::env::var("DBKEEPER_STORAGE_BASE_PATH") {
        config.storage.base_path = PathBuf::from(val);
    }
    if config.storage.base_path.as_os_str().is_empty() {
        if let Ok(val) = std::env::var("BACKUP_BASE_PATH") {
            config.storage.base_path = PathBuf::from(val);
        }
    }

    if let Ok(val) = std::env::var("DBKEEPER_EXPORT_MONGO_TOOL") {
        config.export.mongo_tool = val;
    }
    if let Ok(val) = std::env::var("DBKEEPER_EXPORT_CQL_TOOL") {
        config.export.cql_tool = val;
    }
    if let Ok(val) = std::env::var("DBKEEPER_EXPORT_PROCESS_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.export.process_timeout_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("DBKEEPER_EXPORT_CONNECT_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.export.connect_timeout_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("DBKEEPER_EXPORT_RUN_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.export.run_timeout_secs = secs;
        }
    }

    if let Ok(val) = std::env::var("DBKEEPER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("DBKEEPER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
