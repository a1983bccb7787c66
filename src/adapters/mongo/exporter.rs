//! Single-collection export via `mongoexport`
//!
//! Document store exports target exactly one (host, port); there is no host
//! failover for this engine kind.

use crate::adapters::engine::{ExportTool, ToolInvocation};
use crate::config::ExportConfig;
use crate::core::paths::PathResolver;
use crate::domain::{Backup, BackupError, Result, Target};
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Exports one collection to a JSON artifact
#[derive(Clone)]
pub struct MongoExporter {
    resolver: PathResolver,
    tool: Arc<dyn ExportTool>,
    program: String,
    settings: ExportConfig,
}

impl MongoExporter {
    pub fn new(resolver: PathResolver, tool: Arc<dyn ExportTool>, settings: ExportConfig) -> Self {
        Self {
            resolver,
            tool,
            program: settings.mongo_tool.clone(),
            settings,
        }
    }

    /// Describes the `mongoexport` call for `collection`
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Export`] if the target has no host.
    pub fn invocation(
        &self,
        target: &Target,
        collection: &str,
        destination: PathBuf,
    ) -> Result<ToolInvocation> {
        let endpoint = target.primary_endpoint().ok_or_else(|| {
            BackupError::export(&target.name, collection, "target has no address configured")
        })?;

        let mut invocation = ToolInvocation::new(
            &self.program,
            &target.name,
            &endpoint.host,
            collection,
            &destination,
        )
        .arg("--host")
        .arg(&endpoint.host);

        if let Some(port) = endpoint.port {
            invocation = invocation.arg("--port").arg(port.to_string());
        }

        if !target.username.is_empty() {
            invocation = invocation
                .arg("--username")
                .arg(&target.username)
                .arg("--password")
                .secret_arg(target.password.expose_secret().as_str());
        }

        if let Some(auth_db) = &target.authentication_database {
            invocation = invocation.arg("--authenticationDatabase").arg(auth_db);
        }

        Ok(invocation
            .arg("--db")
            .arg(&target.database)
            .arg("--collection")
            .arg(collection)
            .arg("--out")
            .arg(destination.display().to_string())
            .timeout(self.settings.process_timeout()))
    }

    /// Exports `collection` and records the artifact
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Path`] if the artifact directory cannot be
    /// created or the artifact is missing afterwards, and
    /// [`BackupError::Export`] if the tool fails.
    pub async fn export(
        &self,
        target: &Target,
        collection: &str,
        cancel: &CancellationToken,
    ) -> Result<Backup> {
        let base = self.resolver.prepare(target, collection).await?;
        let mut name = base.into_os_string();
        name.push(format!("-{collection}.json"));
        let destination = PathBuf::from(name);

        let invocation = self.invocation(target, collection, destination.clone())?;

        tracing::info!(
            target_name = %target.name,
            sub_unit = %collection,
            file = %destination.display(),
            "Starting collection export"
        );

        self.tool.run(&invocation, cancel).await?;
        Backup::from_artifact(target, &destination).await
    }
}
