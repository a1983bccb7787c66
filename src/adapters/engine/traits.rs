//! Engine adapter traits
//!
//! Every engine kind is backed by an [`EngineAdapter`]. Connecting an adapter
//! to a target yields a [`TargetSession`], which is owned by that target's
//! outer job and shared read-only with its sub-unit jobs. Sessions are never
//! shared between targets.

use crate::domain::{Backup, Result, Target, TargetKind};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Strategy for one engine kind
#[async_trait]
pub trait EngineAdapter: Send + Sync {
    /// Engine kind this adapter handles
    fn kind(&self) -> TargetKind;

    /// Open a per-target session
    ///
    /// This is where the expensive setup happens (driver connections,
    /// cluster metadata). It runs once per target and run.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::BackupError::Connection`] if the target is
    /// unreachable or rejects the credentials, and
    /// [`crate::domain::BackupError::NotImplemented`] for unsupported kinds.
    async fn connect(
        &self,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<Arc<dyn TargetSession>>;
}

/// Per-target session used by the orchestrator
#[async_trait]
pub trait TargetSession: Send + Sync {
    /// The target this session was opened for
    fn target(&self) -> &Target;

    /// Enumerate the sub-units (collections or tables) of the target
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::BackupError::Connection`] if enumeration fails.
    async fn list_sub_units(&self, cancel: &CancellationToken) -> Result<Vec<String>>;

    /// Export one sub-unit and return the record of the produced artifact
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::BackupError::Export`] or
    /// [`crate::domain::BackupError::Path`]; both concern this sub-unit only.
    async fn export_sub_unit(&self, name: &str, cancel: &CancellationToken) -> Result<Backup>;
}
