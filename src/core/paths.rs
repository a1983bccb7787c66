//! Artifact path resolution
//!
//! Artifacts live at `root/<target name>/<sub-unit>/<RFC 3339 timestamp>`.
//! Paths are keyed by time, not content: two jobs for the same sub-unit in the
//! same second resolve to the same path and the later writer wins.

use crate::domain::{BackupError, Result, Target};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Component, Path, PathBuf};

/// Builds artifact paths below a storage root
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the artifact path for `sub_unit` of `target` at `at`
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Path`] if the target or sub-unit name is not a
    /// single, plain path component.
    pub fn resolve(&self, target: &Target, sub_unit: &str, at: DateTime<Utc>) -> Result<PathBuf> {
        check_component(&target.name)?;
        check_component(sub_unit)?;

        Ok(self
            .root
            .join(&target.name)
            .join(sub_unit)
            .join(at.to_rfc3339_opts(SecondsFormat::Secs, true)))
    }

    /// Resolves the path for the current time and creates its parent directories
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Path`] if the name is invalid or directory
    /// creation fails. The failure only concerns the calling job.
    pub async fn prepare(&self, target: &Target, sub_unit: &str) -> Result<PathBuf> {
        let path = self.resolve(target, sub_unit, Utc::now())?;
        ensure_parent_dirs(&path).await?;
        Ok(path)
    }
}

/// Creates all missing directories above `path`
pub async fn ensure_parent_dirs(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };

    tracing::debug!(path = %parent.display(), "Creating artifact directory");
    tokio::fs::create_dir_all(parent).await.map_err(|e| {
        BackupError::path(
            parent.display().to_string(),
            format!("could not create directory: {e}"),
        )
    })
}

fn check_component(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(()),
        _ => Err(BackupError::path(
            name,
            "name must be a single path component without separators",
        )),
    }
}
