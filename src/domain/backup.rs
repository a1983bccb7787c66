//! Backup artifact record
//!
//! A [`Backup`] describes one completed export of one sub-unit. It is only
//! ever created from a file that already exists on disk, see
//! [`Backup::from_artifact`].

use super::target::{RedactedTarget, Target};
use super::{BackupError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Metadata of one completed export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    /// Freshly generated identifier
    pub id: Uuid,

    /// When the record was created
    pub timestamp: DateTime<Utc>,

    /// Owning target with the credential redacted
    pub target: RedactedTarget,

    /// Absolute artifact path
    pub path: PathBuf,

    /// Artifact size in bytes at the moment of recording
    pub size: u64,
}

impl Backup {
    /// Creates a record for an artifact that an export process has written
    ///
    /// The size is measured by re-reading the file metadata. The record is a
    /// snapshot: the file may keep growing afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Path`] if the file does not exist or its
    /// metadata cannot be read.
    pub async fn from_artifact(target: &Target, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            BackupError::path(
                path.display().to_string(),
                format!("could not measure artifact size: {e}"),
            )
        })?;

        if !metadata.is_file() {
            return Err(BackupError::path(
                path.display().to_string(),
                "artifact is not a regular file",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            target: target.redacted(),
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }

    /// Name of the owning target
    pub fn target_name(&self) -> &str {
        &self.target.name
    }
}
