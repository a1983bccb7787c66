//! Wide-column adapter backed by the Scylla/Cassandra driver

use super::exporter::ColumnarExporter;
use crate::adapters::engine::{EngineAdapter, ExportTool, TargetSession};
use crate::config::ExportConfig;
use crate::core::paths::PathResolver;
use crate::domain::{Backup, BackupError, Result, Target, TargetKind};
use async_trait::async_trait;
use scylla::{Session, SessionBuilder};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const DEFAULT_CQL_PORT: u16 = 9042;

/// Adapter for `cassandra` targets
pub struct ColumnarAdapter {
    exporter: ColumnarExporter,
    settings: ExportConfig,
}

impl ColumnarAdapter {
    pub fn new(resolver: PathResolver, tool: Arc<dyn ExportTool>, settings: ExportConfig) -> Self {
        Self {
            exporter: ColumnarExporter::new(resolver, tool, settings.clone()),
            settings,
        }
    }
}

/// Contact points for the driver, `host:port` per configured endpoint
fn known_nodes(target: &Target) -> Vec<String> {
    target
        .endpoints()
        .into_iter()
        .map(|mut endpoint| {
            endpoint.port.get_or_insert(DEFAULT_CQL_PORT);
            endpoint.to_string()
        })
        .collect()
}

#[async_trait]
impl EngineAdapter for ColumnarAdapter {
    fn kind(&self) -> TargetKind {
        TargetKind::Cassandra
    }

    async fn connect(
        &self,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<Arc<dyn TargetSession>> {
        let nodes = known_nodes(target);
        if nodes.is_empty() {
            return Err(BackupError::connection(&target.name, "no address configured"));
        }

        let mut builder = SessionBuilder::new()
            .known_nodes(&nodes)
            .connection_timeout(self.settings.connect_timeout());
        if !target.username.is_empty() {
            builder = builder.user(
                target.username.as_str(),
                target.password.expose_secret().as_str(),
            );
        }

        let session = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(BackupError::Cancelled(format!(
                    "connecting to '{}'",
                    target.name
                )));
            }
            result = builder.build() => result,
        }
        .map_err(|e| BackupError::connection(&target.name, e.to_string()))?;

        tracing::debug!(
            target_name = %target.name,
            nodes = ?nodes,
            "Opened wide-column session"
        );

        Ok(Arc::new(ColumnarSession {
            target: target.clone(),
            session,
            exporter: self.exporter.clone(),
        }))
    }
}

/// Session for one wide-column target
///
/// Holds the driver session for the lifetime of the target's jobs. Table
/// exports run against the address list of the target, not the session.
pub struct ColumnarSession {
    target: Target,
    session: Session,
    exporter: ColumnarExporter,
}

#[async_trait]
impl TargetSession for ColumnarSession {
    fn target(&self) -> &Target {
        &self.target
    }

    async fn list_sub_units(&self, _cancel: &CancellationToken) -> Result<Vec<String>> {
        let cluster = self.session.get_cluster_data();
        let keyspace = cluster
            .get_keyspace_info()
            .get(&self.target.database)
            .ok_or_else(|| {
                BackupError::connection(
                    &self.target.name,
                    format!("keyspace '{}' not found", self.target.database),
                )
            })?;

        let mut tables: Vec<String> = keyspace.tables.keys().cloned().collect();
        tables.sort();
        Ok(tables)
    }

    async fn export_sub_unit(&self, name: &str, cancel: &CancellationToken) -> Result<Backup> {
        self.exporter.export(&self.target, name, cancel).await
    }
}
