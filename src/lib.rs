// dbkeeper - Database fleet backup agent
// Copyright (c) 2025 dbkeeper Contributors
// Licensed under the MIT License

//! # dbkeeper - database fleet backup agent
//!
//! dbkeeper backs up a fleet of heterogeneous database targets in one run.
//! It asks a control plane which targets are due, exports every collection or
//! table of each target to a file with the engine's own export tool, and
//! reports a record of each artifact back to the control plane.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Orchestration and artifact path resolution
//! - [`adapters`] - Engine adapters, export tools and the control plane client
//! - [`domain`] - Targets, backup records and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbkeeper::adapters::api::{ApiClient, TargetCatalog};
//! use dbkeeper::adapters::engine::AdapterRegistry;
//! use dbkeeper::config::load_config;
//! use dbkeeper::core::orchestrator::Orchestrator;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("dbkeeper.toml")?;
//!     let api = Arc::new(ApiClient::new(&config.api)?);
//!
//!     let targets = api.load_targets().await?;
//!     let orchestrator = Orchestrator::new(AdapterRegistry::from_config(&config), api);
//!     let summary = orchestrator.run_all(targets, &CancellationToken::new()).await;
//!
//!     println!("{} backup(s) reported", summary.reported);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure isolation
//!
//! A run never aborts as a whole. Failing to connect to or enumerate a target
//! ends that target only; a failed export ends that collection or table
//! only; a record the control plane rejects is logged and skipped. Failed
//! exports are listed in [`core::orchestrator::RunSummary::job_failures`].
//!
//! ## Artifacts
//!
//! Artifacts live under `<storage root>/<target>/<sub-unit>/<UTC timestamp>`,
//! with `-<collection>.json` appended for document stores and `.csv` for
//! wide-column stores. Backup records carry the length of the target's
//! password, never the password itself.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
