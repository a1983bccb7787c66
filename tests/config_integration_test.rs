//! Integration tests for configuration loading and validation
//!
//! Every test touches process environment, so all of them take ENV_MUTEX.

use dbkeeper::config::{load_config, load_config_or_env};
use dbkeeper::domain::BackupError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for var in [
        "DBKEEPER_APPLICATION_LOG_LEVEL",
        "DBKEEPER_API_BASE_URL",
        "DBKEEPER_API_TIMEOUT_SECONDS",
        "DBKEEPER_STORAGE_BASE_PATH",
        "DBKEEPER_EXPORT_MONGO_TOOL",
        "DBKEEPER_EXPORT_CQL_TOOL",
        "DBKEEPER_EXPORT_PROCESS_TIMEOUT_SECS",
        "DBKEEPER_EXPORT_CONNECT_TIMEOUT_SECS",
        "DBKEEPER_EXPORT_RUN_TIMEOUT_SECS",
        "DBKEEPER_LOGGING_LOCAL_ENABLED",
        "DBKEEPER_LOGGING_LOCAL_PATH",
        "API_HOST",
        "BACKUP_BASE_PATH",
        "TEST_CONTROL_PLANE_URL",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[api]
base_url = "https://control-plane.internal/api"
timeout_seconds = 10

[storage]
base_path = "/srv/backups"

[export]
mongo_tool = "/opt/mongo/bin/mongoexport"
cql_tool = "/opt/cassandra/bin/cqlsh"
process_timeout_secs = 3600
connect_timeout_secs = 5
run_timeout_secs = 14400

[logging]
local_enabled = false
local_path = "/tmp/dbkeeper"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.api.base_url, "https://control-plane.internal/api");
    assert_eq!(config.api.timeout(), Duration::from_secs(10));
    assert_eq!(config.storage.base_path, PathBuf::from("/srv/backups"));
    assert_eq!(config.export.mongo_tool, "/opt/mongo/bin/mongoexport");
    assert_eq!(config.export.cql_tool, "/opt/cassandra/bin/cqlsh");
    assert_eq!(
        config.export.process_timeout(),
        Some(Duration::from_secs(3600))
    );
    assert_eq!(config.export.connect_timeout(), Duration::from_secs(5));
    assert_eq!(config.export.run_timeout(), Some(Duration::from_secs(14400)));
    assert_eq!(config.logging.local_path, "/tmp/dbkeeper");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[api]
base_url = "http://localhost:8080"

[storage]
base_path = "/var/backups"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.export.mongo_tool, "mongoexport");
    assert_eq!(config.export.cql_tool, "cqlsh");
    assert_eq!(config.export.process_timeout(), None);
    assert_eq!(config.export.run_timeout(), None);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_CONTROL_PLANE_URL", "http://cp.example:9000");

    let temp_file = write_config(
        r#"
# base_url = "${NOT_SET_BUT_COMMENTED}"
[api]
base_url = "${TEST_CONTROL_PLANE_URL}"

[storage]
base_path = "/var/backups"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.api.base_url, "http://cp.example:9000");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[api]
base_url = "${TEST_CONTROL_PLANE_URL}"
"#,
    );

    match load_config(temp_file.path()) {
        Err(BackupError::Configuration(message)) => {
            assert!(message.contains("TEST_CONTROL_PLANE_URL"))
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_env_overrides_win_over_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("DBKEEPER_API_BASE_URL", "https://override.example");
    std::env::set_var("DBKEEPER_EXPORT_PROCESS_TIMEOUT_SECS", "90");
    // Legacy names never override a configured value
    std::env::set_var("BACKUP_BASE_PATH", "/legacy/path");

    let temp_file = write_config(
        r#"
[api]
base_url = "http://localhost:8080"

[storage]
base_path = "/var/backups"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.api.base_url, "https://override.example");
    assert_eq!(
        config.export.process_timeout(),
        Some(Duration::from_secs(90))
    );
    assert_eq!(config.storage.base_path, PathBuf::from("/var/backups"));

    cleanup_env_vars();
}

#[test]
fn test_environment_only_configuration() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("API_HOST", "http://control-plane:8080");
    std::env::set_var("BACKUP_BASE_PATH", "/backups");

    let config = load_config_or_env("/nonexistent/dbkeeper.toml").expect("env config");
    assert_eq!(config.api.base_url, "http://control-plane:8080");
    assert_eq!(config.storage.base_path, PathBuf::from("/backups"));

    cleanup_env_vars();
}

#[test]
fn test_environment_only_requires_api_host() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("BACKUP_BASE_PATH", "/backups");

    let result = load_config_or_env("/nonexistent/dbkeeper.toml");
    assert!(matches!(result, Err(BackupError::Configuration(_))));

    cleanup_env_vars();
}

#[test]
fn test_relative_storage_root_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[api]
base_url = "http://localhost:8080"

[storage]
base_path = "backups"
"#,
    );

    assert!(load_config(temp_file.path()).is_err());
}

#[test]
fn test_invalid_rotation_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[api]
base_url = "http://localhost:8080"

[storage]
base_path = "/var/backups"

[logging]
local_rotation = "weekly"
"#,
    );

    assert!(load_config(temp_file.path()).is_err());
}
