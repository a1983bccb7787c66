//! HTTP control plane client
//!
//! The control plane exposes two endpoints:
//! - `GET {base}/targetsWithPendingBackups` returns a JSON array of targets
//! - `POST {base}/backup` accepts one backup record

use super::traits::{Reporter, TargetCatalog};
use crate::config::ApiConfig;
use crate::domain::{ApiError, Backup, BackupError, Result, Target};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use std::time::Duration;

const TARGETS_PATH: &str = "targetsWithPendingBackups";
const BACKUP_PATH: &str = "backup";

/// reqwest based client for the control plane
///
/// # Example
///
/// ```no_run
/// use dbkeeper::adapters::api::{ApiClient, TargetCatalog};
/// use dbkeeper::config::ApiConfig;
///
/// # async fn example() -> dbkeeper::domain::Result<()> {
/// let config = ApiConfig {
///     base_url: "http://control-plane:8080".to_string(),
///     ..Default::default()
/// };
/// let client = ApiClient::new(&config)?;
/// let targets = client.load_targets().await?;
/// println!("{} target(s) due", targets.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Creates a client for the configured control plane
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Configuration`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("dbkeeper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackupError::Configuration(format!("could not build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn check_status(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::ServerError {
            status: status.as_u16(),
            message: body,
        }
        .into())
    }
}

#[async_trait]
impl TargetCatalog for ApiClient {
    async fn load_targets(&self) -> Result<Vec<Target>> {
        let url = self.url(TARGETS_PATH);
        tracing::debug!(url = %url, "Fetching targets with pending backups");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(format!("GET {url}: {e}")))?;
        let resp = Self::check_status(resp).await?;

        let targets = resp
            .json::<Vec<Target>>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("target list: {e}")))?;

        tracing::info!(count = targets.len(), "Loaded targets");
        Ok(targets)
    }
}

#[async_trait]
impl Reporter for ApiClient {
    async fn report(&self, backup: &Backup) -> Result<()> {
        let url = self.url(BACKUP_PATH);

        let resp = self
            .client
            .post(&url)
            .json(backup)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(format!("POST {url}: {e}")))?;
        Self::check_status(resp).await?;

        tracing::debug!(
            backup_id = %backup.id,
            target_name = %backup.target_name(),
            "Reported backup"
        );
        Ok(())
    }
}
