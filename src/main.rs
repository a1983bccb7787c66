// dbkeeper - Database fleet backup agent
// Copyright (c) 2025 dbkeeper Contributors
// Licensed under the MIT License

use dbkeeper::cli::commands::{EXIT_CONFIG, EXIT_FATAL};
use dbkeeper::cli::{Cli, Commands};
use dbkeeper::config::{load_config_or_env, LoggingConfig};
use dbkeeper::logging::init_logging;
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = load_config_or_env(&cli.config);

    // CLI level wins over the configured one
    let (log_level, logging_config) = match &config {
        Ok(c) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| c.application.log_level.clone()),
            c.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "dbkeeper - database fleet backup agent"
    );

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let exit_code = match execute_command(&cli, config, cancel).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors; flush the file writer first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    config: dbkeeper::domain::Result<dbkeeper::config::KeeperConfig>,
    cancel: CancellationToken,
) -> anyhow::Result<i32> {
    if let Commands::ValidateConfig(args) = &cli.command {
        return args.execute(&cli.config).await;
    }

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, config_path = %cli.config, "Failed to load configuration");
            eprintln!("Failed to load configuration: {e}");
            return Ok(EXIT_CONFIG);
        }
    };

    match &cli.command {
        Commands::Run(args) => args.execute(&config, cancel).await,
        Commands::Targets(args) => args.execute(&config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
    }
}

/// Cancels the run on SIGINT or SIGTERM
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, cancelling running exports"),
        _ = terminate => tracing::info!("Received SIGTERM, cancelling running exports"),
    }

    cancel.cancel();
}
