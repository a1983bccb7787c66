//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for dbkeeper using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// dbkeeper - database fleet backup agent
#[derive(Parser, Debug)]
#[command(name = "dbkeeper")]
#[command(version, about, long_about = None)]
#[command(author = "dbkeeper Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "dbkeeper.toml", env = "DBKEEPER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DBKEEPER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up every target with a pending backup and report the artifacts
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List the targets the control plane reports as due
    Targets(commands::targets::TargetsArgs),
}
