//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human readable console output
//! - Optional JSON log files with rotation
//! - Helper macros that keep field names consistent across adapters
//!
//! # Example
//!
//! ```no_run
//! use dbkeeper::logging::init_logging;
//! use dbkeeper::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(target_name = "shop", "Starting backup");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a failed sub-unit job
///
/// # Example
///
/// ```no_run
/// use dbkeeper::log_job_failure;
/// use dbkeeper::domain::BackupError;
///
/// let error = BackupError::export("shop", "orders", "exit status: 1");
/// log_job_failure!("shop", "orders", &error);
/// ```
#[macro_export]
macro_rules! log_job_failure {
    ($target:expr, $sub_unit:expr, $error:expr) => {
        tracing::error!(
            target_name = %$target,
            sub_unit = %$sub_unit,
            error = %$error,
            "Sub-unit backup failed"
        );
    };
}

/// Log a failed host attempt during failover
///
/// # Example
///
/// ```no_run
/// use dbkeeper::log_host_attempt_failed;
///
/// log_host_attempt_failed!("events", "users", "10.0.0.1", "connection refused", 1, 3);
/// ```
#[macro_export]
macro_rules! log_host_attempt_failed {
    ($target:expr, $sub_unit:expr, $host:expr, $error:expr, $attempt:expr, $hosts:expr) => {
        tracing::warn!(
            target_name = %$target,
            sub_unit = %$sub_unit,
            host = %$host,
            attempt = $attempt,
            hosts = $hosts,
            error = %$error,
            "Export attempt failed on host"
        );
    };
}

/// Log a sub-unit export after every host has failed
///
/// `$error` is expected to render every attempt.
#[macro_export]
macro_rules! log_failover_exhausted {
    ($target:expr, $sub_unit:expr, $attempts:expr, $error:expr) => {
        tracing::error!(
            target_name = %$target,
            sub_unit = %$sub_unit,
            attempts = $attempts,
            error = %$error,
            "All hosts failed"
        );
    };
}
