//! Document store adapter backed by the MongoDB driver

use super::exporter::MongoExporter;
use crate::adapters::engine::{EngineAdapter, ExportTool, TargetSession};
use crate::config::ExportConfig;
use crate::core::paths::PathResolver;
use crate::domain::{Backup, BackupError, Result, Target, TargetKind};
use async_trait::async_trait;
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::Client;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Adapter for `mongo` targets
pub struct MongoAdapter {
    exporter: MongoExporter,
    settings: ExportConfig,
}

impl MongoAdapter {
    pub fn new(resolver: PathResolver, tool: Arc<dyn ExportTool>, settings: ExportConfig) -> Self {
        Self {
            exporter: MongoExporter::new(resolver, tool, settings.clone()),
            settings,
        }
    }

    fn client_options(&self, target: &Target) -> Result<ClientOptions> {
        let endpoint = target
            .primary_endpoint()
            .ok_or_else(|| BackupError::connection(&target.name, "no address configured"))?;

        let address = ServerAddress::parse(endpoint.to_string())
            .map_err(|e| BackupError::connection(&target.name, format!("invalid address: {e}")))?;

        let mut options = ClientOptions::default();
        options.hosts = vec![address];
        options.app_name = Some("dbkeeper".to_string());
        options.connect_timeout = Some(self.settings.connect_timeout());
        options.server_selection_timeout = Some(self.settings.connect_timeout());

        if !target.username.is_empty() {
            let mut credential = Credential::default();
            credential.username = Some(target.username.clone());
            credential.password = Some(target.password.expose_secret().as_str().to_string());
            credential.source = target.authentication_database.clone();
            options.credential = Some(credential);
        }

        Ok(options)
    }
}

#[async_trait]
impl EngineAdapter for MongoAdapter {
    fn kind(&self) -> TargetKind {
        TargetKind::Mongo
    }

    async fn connect(
        &self,
        target: &Target,
        _cancel: &CancellationToken,
    ) -> Result<Arc<dyn TargetSession>> {
        let options = self.client_options(target)?;
        let client = Client::with_options(options)
            .map_err(|e| BackupError::connection(&target.name, e.to_string()))?;

        tracing::debug!(
            target_name = %target.name,
            database = %target.database,
            "Opened document store client"
        );

        Ok(Arc::new(MongoSession {
            target: target.clone(),
            client,
            exporter: self.exporter.clone(),
        }))
    }
}

/// Session for one document store target
///
/// The driver connects lazily; the first round trip happens when the
/// collections are listed.
pub struct MongoSession {
    target: Target,
    client: Client,
    exporter: MongoExporter,
}

#[async_trait]
impl TargetSession for MongoSession {
    fn target(&self) -> &Target {
        &self.target
    }

    async fn list_sub_units(&self, cancel: &CancellationToken) -> Result<Vec<String>> {
        let database = self.client.database(&self.target.database);

        let names = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(BackupError::Cancelled(format!(
                    "listing collections of '{}'",
                    self.target.name
                )));
            }
            result = database.list_collection_names(None) => result,
        }
        .map_err(|e| {
            BackupError::connection(
                &self.target.name,
                format!("could not list collections: {e}"),
            )
        })?;

        let mut names: Vec<String> = names
            .into_iter()
            .filter(|name| !name.starts_with("system."))
            .collect();
        names.sort();
        Ok(names)
    }

    async fn export_sub_unit(&self, name: &str, cancel: &CancellationToken) -> Result<Backup> {
        self.exporter.export(&self.target, name, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::engine::ProcessTool;

    fn adapter() -> MongoAdapter {
        MongoAdapter::new(
            PathResolver::new("/var/backups"),
            Arc::new(ProcessTool::new()),
            ExportConfig::default(),
        )
    }

    fn target(address: &str) -> Target {
        Target::builder()
            .name("shop")
            .kind(TargetKind::Mongo)
            .address(address)
            .port(27017)
            .username("backup")
            .password("hunter2")
            .database("shop_db")
            .authentication_database("admin")
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_options_use_first_host() {
        let options = adapter()
            .client_options(&target("mongo-0.internal, mongo-1.internal"))
            .unwrap();
        assert_eq!(options.hosts.len(), 1);
        assert_eq!(options.hosts[0].to_string(), "mongo-0.internal:27017");

        let credential = options.credential.unwrap();
        assert_eq!(credential.username.as_deref(), Some("backup"));
        assert_eq!(credential.source.as_deref(), Some("admin"));
    }

    #[test]
    fn test_client_options_keep_entry_port() {
        let options = adapter().client_options(&target("mongo-0.internal:27018")).unwrap();
        assert_eq!(options.hosts[0].to_string(), "mongo-0.internal:27018");
    }

    #[test]
    fn test_client_options_without_address() {
        let mut t = target("x");
        t.address = String::new();
        let result = adapter().client_options(&t);
        assert!(matches!(result, Err(BackupError::Connection { .. })));
    }

    #[test]
    fn test_kind() {
        assert_eq!(adapter().kind(), TargetKind::Mongo);
    }
}
