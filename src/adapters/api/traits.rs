//! Control plane collaborator traits

use crate::domain::{Backup, Result, Target};
use async_trait::async_trait;

/// Source of the targets that are due for backup
#[async_trait]
pub trait TargetCatalog: Send + Sync {
    /// Loads the due targets; an empty list means there is nothing to do
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::BackupError::Api`] if the catalog cannot be
    /// fetched or decoded.
    async fn load_targets(&self) -> Result<Vec<Target>>;
}

/// Sink for completed backup records
///
/// Called once per record, sequentially, from the run's single consumer.
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn report(&self, backup: &Backup) -> Result<()>;
}
