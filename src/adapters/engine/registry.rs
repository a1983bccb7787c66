//! Adapter registry
//!
//! Maps each [`TargetKind`] to exactly one [`EngineAdapter`].

use super::tool::{ExportTool, ProcessTool};
use super::traits::EngineAdapter;
use crate::adapters::columnar::ColumnarAdapter;
use crate::adapters::mongo::MongoAdapter;
use crate::adapters::relational::RelationalAdapter;
use crate::config::KeeperConfig;
use crate::core::paths::PathResolver;
use crate::domain::{BackupError, Result, TargetKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup table from engine kind to adapter
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<TargetKind, Arc<dyn EngineAdapter>>,
}

impl AdapterRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the production registry from configuration
    ///
    /// Document and wide-column targets export through child processes;
    /// relational targets get the always-failing stub.
    pub fn from_config(config: &KeeperConfig) -> Self {
        let resolver = PathResolver::new(&config.storage.base_path);
        let tool: Arc<dyn ExportTool> = Arc::new(ProcessTool::new());

        Self::new()
            .with(Arc::new(MongoAdapter::new(
                resolver.clone(),
                tool.clone(),
                config.export.clone(),
            )))
            .with(Arc::new(ColumnarAdapter::new(
                resolver,
                tool,
                config.export.clone(),
            )))
            .with(Arc::new(RelationalAdapter))
    }

    /// Registers `adapter` for its kind, replacing any previous one
    pub fn with(mut self, adapter: Arc<dyn EngineAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    /// Adapter responsible for `kind`
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::NotImplemented`] if no adapter is registered.
    pub fn adapter_for(&self, kind: TargetKind) -> Result<Arc<dyn EngineAdapter>> {
        self.adapters.get(&kind).cloned().ok_or_else(|| {
            BackupError::NotImplemented(format!("no adapter for target kind '{kind}'"))
        })
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
