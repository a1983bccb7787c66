//! Fakes shared by the orchestration tests
//!
//! The adapters here skip the database drivers but run the real exporters,
//! path resolver and backup record creation. Export tools write files
//! instead of spawning processes.

#![allow(dead_code)]

use async_trait::async_trait;
use dbkeeper::adapters::api::Reporter;
use dbkeeper::adapters::columnar::ColumnarExporter;
use dbkeeper::adapters::engine::{EngineAdapter, ExportTool, TargetSession, ToolInvocation};
use dbkeeper::adapters::mongo::MongoExporter;
use dbkeeper::config::ExportConfig;
use dbkeeper::core::paths::PathResolver;
use dbkeeper::domain::{ApiError, Backup, BackupError, Result, Target, TargetKind};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const PAYLOAD: &[u8] = b"exported-data\n";

/// Export tool that writes [`PAYLOAD`] to the destination
#[derive(Default)]
pub struct FileTool {
    failing_units: HashSet<(String, String)>,
    failing_hosts: HashSet<String>,
    calls: AtomicUsize,
}

impl FileTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every export of `sub_unit` on `target`
    pub fn fail_unit(mut self, target: &str, sub_unit: &str) -> Self {
        self.failing_units
            .insert((target.to_string(), sub_unit.to_string()));
        self
    }

    /// Fail every export directed at `host`
    pub fn fail_host(mut self, host: &str) -> Self {
        self.failing_hosts.insert(host.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExportTool for FileTool {
    async fn run(&self, invocation: &ToolInvocation, _cancel: &CancellationToken) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let key = (invocation.target.clone(), invocation.sub_unit.clone());
        if self.failing_units.contains(&key) || self.failing_hosts.contains(&invocation.host) {
            return Err(BackupError::export(
                &invocation.target,
                &invocation.sub_unit,
                format!("exit status: 1 (host {})", invocation.host),
            ));
        }

        tokio::fs::write(&invocation.destination, PAYLOAD).await?;
        Ok(())
    }
}

/// Export tool that blocks until the run is cancelled
#[derive(Default)]
pub struct HangingTool {
    pub started: AtomicUsize,
}

#[async_trait]
impl ExportTool for HangingTool {
    async fn run(&self, invocation: &ToolInvocation, cancel: &CancellationToken) -> Result<()> {
        self.started.fetch_add(1, Ordering::SeqCst);
        cancel.cancelled().await;
        Err(BackupError::Cancelled(format!(
            "{}/{}",
            invocation.target, invocation.sub_unit
        )))
    }
}

#[derive(Clone)]
enum Exporter {
    Mongo(MongoExporter),
    Columnar(ColumnarExporter),
}

/// Adapter whose sessions list a fixed set of sub-units per target
pub struct FixedAdapter {
    kind: TargetKind,
    exporter: Exporter,
    sub_units: HashMap<String, Vec<String>>,
    default_sub_units: Vec<String>,
    unreachable: HashSet<String>,
    pub connects: AtomicUsize,
}

impl FixedAdapter {
    pub fn mongo(root: &Path, tool: Arc<dyn ExportTool>) -> Self {
        Self::new(
            TargetKind::Mongo,
            Exporter::Mongo(MongoExporter::new(
                PathResolver::new(root),
                tool,
                ExportConfig::default(),
            )),
        )
    }

    pub fn columnar(root: &Path, tool: Arc<dyn ExportTool>) -> Self {
        Self::new(
            TargetKind::Cassandra,
            Exporter::Columnar(ColumnarExporter::new(
                PathResolver::new(root),
                tool,
                ExportConfig::default(),
            )),
        )
    }

    fn new(kind: TargetKind, exporter: Exporter) -> Self {
        Self {
            kind,
            exporter,
            sub_units: HashMap::new(),
            default_sub_units: Vec::new(),
            unreachable: HashSet::new(),
            connects: AtomicUsize::new(0),
        }
    }

    /// Sub-units listed for targets without an explicit entry
    pub fn with_default_sub_units(mut self, names: &[&str]) -> Self {
        self.default_sub_units = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_sub_units(mut self, target: &str, names: &[&str]) -> Self {
        self.sub_units.insert(
            target.to_string(),
            names.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Connecting to `target` fails
    pub fn unreachable(mut self, target: &str) -> Self {
        self.unreachable.insert(target.to_string());
        self
    }
}

#[async_trait]
impl EngineAdapter for FixedAdapter {
    fn kind(&self) -> TargetKind {
        self.kind
    }

    async fn connect(
        &self,
        target: &Target,
        _cancel: &CancellationToken,
    ) -> Result<Arc<dyn TargetSession>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.contains(&target.name) {
            return Err(BackupError::connection(&target.name, "connection refused"));
        }

        let sub_units = self
            .sub_units
            .get(&target.name)
            .cloned()
            .unwrap_or_else(|| self.default_sub_units.clone());

        Ok(Arc::new(FixedSession {
            target: target.clone(),
            sub_units,
            exporter: self.exporter.clone(),
        }))
    }
}

struct FixedSession {
    target: Target,
    sub_units: Vec<String>,
    exporter: Exporter,
}

#[async_trait]
impl TargetSession for FixedSession {
    fn target(&self) -> &Target {
        &self.target
    }

    async fn list_sub_units(&self, _cancel: &CancellationToken) -> Result<Vec<String>> {
        Ok(self.sub_units.clone())
    }

    async fn export_sub_unit(&self, name: &str, cancel: &CancellationToken) -> Result<Backup> {
        match &self.exporter {
            Exporter::Mongo(exporter) => exporter.export(&self.target, name, cancel).await,
            Exporter::Columnar(exporter) => exporter.export(&self.target, name, cancel).await,
        }
    }
}

/// Reporter that keeps every record it receives
#[derive(Default)]
pub struct CollectingReporter {
    backups: Mutex<Vec<Backup>>,
    calls: AtomicUsize,
    fail_every: Option<usize>,
    delay: Option<Duration>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every `n`-th record
    pub fn failing_every(n: usize) -> Self {
        Self {
            fail_every: Some(n),
            ..Self::default()
        }
    }

    /// Sleep before accepting each record
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn backups(&self) -> Vec<Backup> {
        self.backups.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reporter for CollectingReporter {
    async fn report(&self, backup: &Backup) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if matches!(self.fail_every, Some(n) if call % n == 0) {
            return Err(ApiError::ServerError {
                status: 500,
                message: "rejected".to_string(),
            }
            .into());
        }
        self.backups.lock().unwrap().push(backup.clone());
        Ok(())
    }
}

pub fn mongo_target(name: &str) -> Target {
    Target::builder()
        .id(format!("id-{name}"))
        .name(name)
        .kind(TargetKind::Mongo)
        .address("mongo-0.internal")
        .port(27017)
        .username("backup")
        .password("s3cr3t-value")
        .database(name)
        .authentication_database("admin")
        .build()
        .unwrap()
}

pub fn columnar_target(name: &str, address: &str) -> Target {
    Target::builder()
        .id(format!("id-{name}"))
        .name(name)
        .kind(TargetKind::Cassandra)
        .address(address)
        .port(9042)
        .username("cassandra")
        .password("cassandra")
        .database("telemetry")
        .build()
        .unwrap()
}

pub fn mysql_target(name: &str) -> Target {
    Target::builder()
        .name(name)
        .kind(TargetKind::Mysql)
        .address("mysql.internal")
        .port(3306)
        .build()
        .unwrap()
}
