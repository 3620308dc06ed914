//! Taxosync CLI - Main entry point

use clap::Parser;
use std::process;
use taxosync_cli::{Cli, Commands};
use taxosync_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use tracing::error;

#[tokio::main]
async fn main() {
    // Pick up TAXOSYNC_* variables from a .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging based on verbose flag and environment
    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Console)
            .log_file_prefix("taxosync".to_string())
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::Console)
            .log_file_prefix("taxosync".to_string())
            .build()
    };

    // Environment variables take precedence
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    // The CLI should still work when logging cannot be initialized
    let _ = init_logging(&log_config);

    let result = match cli.command {
        Commands::Import { .. } => taxosync_cli::commands::import::run(cli.run_config()).await,
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
