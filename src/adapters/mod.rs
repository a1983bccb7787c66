//! External system integrations for dbkeeper.
//!
//! - [`engine`] - engine adapter traits, registry and export tool capability
//! - [`mongo`] - document store adapter (MongoDB driver, `mongoexport`)
//! - [`columnar`] - wide-column adapter (Scylla driver, `cqlsh`) with host failover
//! - [`relational`] - placeholder adapter for relational targets
//! - [`api`] - control plane client (target catalog and backup reports)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate drivers and external
//! processes from the orchestrator. Each adapter is split into a session
//! that talks to the database and an exporter that only builds tool
//! invocations, so exports can be tested with a fake [`engine::ExportTool`]:
//!
//! ```rust,no_run
//! use dbkeeper::adapters::engine::ProcessTool;
//! use dbkeeper::adapters::mongo::MongoExporter;
//! use dbkeeper::config::ExportConfig;
//! use dbkeeper::core::paths::PathResolver;
//! use dbkeeper::domain::{Target, TargetKind};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = MongoExporter::new(
//!     PathResolver::new("/var/backups"),
//!     Arc::new(ProcessTool::new()),
//!     ExportConfig::default(),
//! );
//! let target = Target::builder()
//!     .name("shop")
//!     .kind(TargetKind::Mongo)
//!     .address("mongo-0.internal")
//!     .port(27017)
//!     .database("shop")
//!     .build()?;
//!
//! let backup = exporter.export(&target, "orders", &CancellationToken::new()).await?;
//! println!("{} bytes at {}", backup.size, backup.path.display());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod columnar;
pub mod engine;
pub mod mongo;
pub mod relational;
