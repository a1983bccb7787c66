//! Table export via `cqlsh COPY ... TO`

use super::failover::run_with_failover;
use crate::adapters::engine::{ExportTool, ToolInvocation};
use crate::config::ExportConfig;
use crate::core::paths::PathResolver;
use crate::domain::{Backup, Result, Target};
use crate::log_failover_exhausted;
use secrecy::ExposeSecret;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Exports one table to a CSV artifact, failing over across hosts
#[derive(Clone)]
pub struct ColumnarExporter {
    resolver: PathResolver,
    tool: Arc<dyn ExportTool>,
    settings: ExportConfig,
}

impl ColumnarExporter {
    pub fn new(resolver: PathResolver, tool: Arc<dyn ExportTool>, settings: ExportConfig) -> Self {
        Self {
            resolver,
            tool,
            settings,
        }
    }

    /// One `cqlsh` call per endpoint, in address order
    pub fn invocations(&self, target: &Target, table: &str, destination: &Path) -> Vec<ToolInvocation> {
        let statement = copy_statement(&target.database, table, destination);

        target
            .endpoints()
            .into_iter()
            .map(|endpoint| {
                let mut invocation = ToolInvocation::new(
                    &self.settings.cql_tool,
                    &target.name,
                    &endpoint.host,
                    table,
                    destination,
                )
                .arg(&endpoint.host);

                if let Some(port) = endpoint.port {
                    invocation = invocation.arg(port.to_string());
                }

                if !target.username.is_empty() {
                    invocation = invocation
                        .arg("-u")
                        .arg(&target.username)
                        .arg("-p")
                        .secret_arg(target.password.expose_secret().as_str());
                }

                invocation
                    .arg("-e")
                    .arg(&statement)
                    .timeout(self.settings.process_timeout())
            })
            .collect()
    }

    /// Exports `table`, trying each host until one succeeds
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::BackupError::Path`] for directory or artifact
    /// problems. When every host fails, the error of the last host is
    /// returned; earlier attempts are logged.
    pub async fn export(&self, target: &Target, table: &str, cancel: &CancellationToken) -> Result<Backup> {
        let base = self.resolver.prepare(target, table).await?;
        let mut name = base.into_os_string();
        name.push(".csv");
        let destination = PathBuf::from(name);

        tracing::info!(
            target_name = %target.name,
            sub_unit = %table,
            file = %destination.display(),
            "Starting table export"
        );

        let invocations = self.invocations(target, table, &destination);
        run_with_failover(self.tool.as_ref(), &target.name, table, invocations, cancel)
            .await
            .map_err(|e| {
                log_failover_exhausted!(&target.name, table, e.attempts.len(), &e);
                e.into_primary()
            })?;

        Backup::from_artifact(target, &destination).await
    }
}

/// `COPY` statement with quoted identifiers and an escaped file literal
fn copy_statement(keyspace: &str, table: &str, destination: &Path) -> String {
    format!(
        "use {}; COPY {} TO '{}'",
        quote_identifier(keyspace),
        quote_identifier(table),
        destination.display().to_string().replace('\'', "''")
    )
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BackupError, TargetKind};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Writes the artifact unless the host is listed as down
    struct NodeTool {
        down: Vec<&'static str>,
        tried: Mutex<Vec<String>>,
    }

    impl NodeTool {
        fn new(down: Vec<&'static str>) -> Self {
            Self {
                down,
                tried: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ExportTool for NodeTool {
        async fn run(&self, invocation: &ToolInvocation, _cancel: &CancellationToken) -> Result<()> {
            self.tried.lock().unwrap().push(invocation.host.clone());
            if self.down.contains(&invocation.host.as_str()) {
                return Err(BackupError::export(
                    &invocation.target,
                    &invocation.sub_unit,
                    format!("Connection refused (host {})", invocation.host),
                ));
            }
            tokio::fs::write(&invocation.destination, "id,value\n1,a\n").await?;
            Ok(())
        }
    }

    fn target() -> Target {
        Target::builder()
            .name("metrics")
            .kind(TargetKind::Cassandra)
            .address("h1,h2")
            .port(9042)
            .username("cassandra")
            .password("cassandra")
            .database("telemetry")
            .build()
            .unwrap()
    }

    #[test]
    fn test_invocations_one_per_host() {
        let exporter = ColumnarExporter::new(
            PathResolver::new("/var/backups"),
            Arc::new(NodeTool::new(vec![])),
            ExportConfig::default(),
        );
        let invocations = exporter.invocations(&target(), "events", Path::new("/tmp/e.csv"));

        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0].host, "h1");
        assert_eq!(invocations[1].host, "h2");
        assert_eq!(
            invocations[0].redacted_command_line(),
            r#"cqlsh h1 9042 -u cassandra -p ****** -e use "telemetry"; COPY "events" TO '/tmp/e.csv'"#
        );
    }

    #[tokio::test]
    async fn test_export_fails_over() {
        let dir = TempDir::new().unwrap();
        let tool = Arc::new(NodeTool::new(vec!["h1"]));
        let exporter = ColumnarExporter::new(
            PathResolver::new(dir.path()),
            tool.clone(),
            ExportConfig::default(),
        );

        let backup = exporter
            .export(&target(), "events", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(*tool.tried.lock().unwrap(), vec!["h1", "h2"]);
        assert!(backup.path.to_string_lossy().ends_with(".csv"));
        assert_eq!(backup.size, 13);
    }

    #[tokio::test]
    async fn test_export_all_hosts_down() {
        let dir = TempDir::new().unwrap();
        let tool = Arc::new(NodeTool::new(vec!["h1", "h2"]));
        let exporter = ColumnarExporter::new(
            PathResolver::new(dir.path()),
            tool,
            ExportConfig::default(),
        );

        let err = exporter
            .export(&target(), "events", &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            BackupError::Export { message, .. } => assert!(message.contains("host h2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_all_hosts_down_logs_every_attempt() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _default = tracing::subscriber::set_default(subscriber);

        let dir = TempDir::new().unwrap();
        let exporter = ColumnarExporter::new(
            PathResolver::new(dir.path()),
            Arc::new(NodeTool::new(vec!["h1", "h2"])),
            ExportConfig::default(),
        );
        exporter
            .export(&target(), "events", &CancellationToken::new())
            .await
            .unwrap_err();

        let output = logs.contents();
        let line = output
            .lines()
            .find(|l| l.contains("All hosts failed"))
            .unwrap_or_else(|| panic!("no aggregate line in:\n{output}"));
        assert!(line.contains("attempts=2"));
        assert!(line.contains("host h1"));
        assert!(line.contains("host h2"));
    }

    #[test]
    fn test_invocations_split_port_qualified_entries() {
        let target = Target::builder()
            .name("metrics")
            .kind(TargetKind::Cassandra)
            .address("cass-0:7000,cass-1")
            .port(9042)
            .database("ks")
            .build()
            .unwrap();
        let exporter = ColumnarExporter::new(
            PathResolver::new("/b"),
            Arc::new(NodeTool::new(vec![])),
            ExportConfig::default(),
        );

        let invocations = exporter.invocations(&target, "tbl", Path::new("/b/x.csv"));
        assert_eq!(invocations[0].host, "cass-0");
        assert_eq!(
            invocations[0].redacted_command_line(),
            r#"cqlsh cass-0 7000 -e use "ks"; COPY "tbl" TO '/b/x.csv'"#
        );
        assert!(invocations[1]
            .redacted_command_line()
            .starts_with("cqlsh cass-1 9042 -e"));
    }

    #[test]
    fn test_copy_statement_quotes_names() {
        let statement = copy_statement("Telemetry", "Events\"x", Path::new("/b/o'brien.csv"));
        assert_eq!(
            statement,
            r#"use "Telemetry"; COPY "Events""x" TO '/b/o''brien.csv'"#
        );
    }
}
