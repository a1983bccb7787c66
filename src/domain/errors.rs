//! Domain error types
//!
//! This module defines the error hierarchy for dbkeeper. All errors are
//! domain-specific and don't expose third-party driver or HTTP client types.

use thiserror::Error;

/// Main dbkeeper error type
///
/// Every fallible operation in the crate returns this type. How far a failure
/// propagates is decided by where it happens, not by its variant.
#[derive(Debug, Clone, Error)]
pub enum BackupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Enumeration or session setup against a target failed
    #[error("Connection error for target '{target}': {message}")]
    Connection { target: String, message: String },

    /// An external export process for one sub-unit failed
    #[error("Export error for '{target}/{sub_unit}': {message}")]
    Export {
        target: String,
        sub_unit: String,
        message: String,
    },

    /// Artifact path could not be prepared
    #[error("Path error for '{path}': {message}")]
    Path { path: String, message: String },

    /// The target kind has no working adapter
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Control plane errors
    #[error("Control plane error: {0}")]
    Api(#[from] ApiError),

    /// Work was cancelled before it finished
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Control plane (catalog and report endpoint) errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request could not be sent or no response arrived
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-success status
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// The response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BackupError {
    /// Builds a connection error for `target`
    pub fn connection(target: impl Into<String>, message: impl Into<String>) -> Self {
        BackupError::Connection {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Builds an export error for one sub-unit of `target`
    pub fn export(
        target: impl Into<String>,
        sub_unit: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        BackupError::Export {
            target: target.into(),
            sub_unit: sub_unit.into(),
            message: message.into(),
        }
    }

    /// Builds a path error
    pub fn path(path: impl Into<String>, message: impl Into<String>) -> Self {
        BackupError::Path {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error was caused by cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, BackupError::Cancelled(_))
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        BackupError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        BackupError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BackupError {
    fn from(err: toml::de::Error) -> Self {
        BackupError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_error_display() {
        let err = BackupError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_export_error_carries_context() {
        let err = BackupError::export("shop", "orders", "exit status 1");
        let message = err.to_string();
        assert!(message.contains("shop/orders"));
        assert!(message.contains("exit status 1"));
    }

    #[test]
    fn test_api_error_conversion() {
        let api_err = ApiError::ServerError {
            status: 503,
            message: "unavailable".to_string(),
        };
        let err: BackupError = api_err.into();
        assert!(matches!(err, BackupError::Api(_)));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: BackupError = io_err.into();
        assert!(matches!(err, BackupError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: BackupError = json_err.into();
        assert!(matches!(err, BackupError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: BackupError = toml_err.into();
        assert!(matches!(err, BackupError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_cancelled_detection() {
        assert!(BackupError::Cancelled("shutdown".to_string()).is_cancelled());
        assert!(!BackupError::Other("x".to_string()).is_cancelled());
    }
}
