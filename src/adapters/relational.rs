//! Relational engine adapter
//!
//! Relational targets can be registered in the control plane but there is no
//! export path for them yet. Connecting always fails, which aborts the target
//! without touching the database.

use crate::adapters::engine::{EngineAdapter, TargetSession};
use crate::domain::{BackupError, Result, Target, TargetKind};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct RelationalAdapter;

#[async_trait]
impl EngineAdapter for RelationalAdapter {
    fn kind(&self) -> TargetKind {
        TargetKind::Mysql
    }

    async fn connect(
        &self,
        target: &Target,
        _cancel: &CancellationToken,
    ) -> Result<Arc<dyn TargetSession>> {
        Err(BackupError::NotImplemented(format!(
            "{} backups are not implemented (target '{}')",
            target.kind, target.name
        )))
    }
}
