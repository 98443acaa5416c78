//! sessiongate - session-gated HTTP API backend

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sessiongate::{config::ConfigManager, ApiServer, AppState, ShutdownCoordinator};

/// CLI arguments for sessiongate
#[derive(Parser, Debug)]
#[command(name = "sessiongate")]
#[command(about = "Session-gated HTTP API backend")]
#[command(version)]
#[command(long_about = "
sessiongate - session-gated HTTP API backend for accounts, images and notifications

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration file
3. Environment variables
4. Built-in defaults

Environment variables:
  SESSIONGATE_BIND_ADDR         - Bind address (e.g., 127.0.0.1:8080)
  SESSIONGATE_SHUTDOWN_TIMEOUT  - Graceful shutdown timeout (e.g., 30s)
  SESSIONGATE_MAX_IMAGE_BYTES   - Largest accepted image upload in bytes
  SESSIONGATE_LOG_LEVEL         - Log level (trace, debug, info, warn, error)
")]
pub struct CliArgs {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "config.toml",
        help = "Path to configuration file"
    )]
    pub config: PathBuf,

    /// Bind address (overrides config file)
    #[arg(short, long, help = "Bind address (e.g., 127.0.0.1:8080)")]
    pub bind: Option<String>,

    /// Port to bind to (overrides config file)
    #[arg(short, long, help = "Port to bind to")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, help = "Log level")]
    pub log_level: Option<String>,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Largest accepted image upload in bytes
    #[arg(long, help = "Largest accepted image upload in bytes")]
    pub max_image_bytes: Option<usize>,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration and exit")]
    pub validate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Load configuration with priority: CLI args > config file > environment > defaults
    let mut config = if args.config.exists() {
        ConfigManager::load_from_file(&args.config)?
    } else {
        ConfigManager::load_from_env()?
    };

    if let Some(level) = &args.log_level {
        config.monitoring.log_level = level.clone();
    }

    init_tracing(&args, &config.monitoring.log_level)?;

    info!(
        "Starting sessiongate v{}",
        env!("CARGO_PKG_VERSION")
    );

    config.merge_with_cli_args(args.bind.as_deref(), args.port, args.max_image_bytes);

    config
        .validate()
        .context("Final configuration validation failed")?;

    if args.validate_config {
        info!("Configuration is valid");
        info!("Configuration summary:");
        info!("  Bind address: {}", config.server.bind_addr);
        info!("  Shutdown timeout: {:?}", config.server.shutdown_timeout);
        info!("  Session header: {}", config.auth.session_header);
        info!(
            "  Argon2: {} KiB, {} iteration(s), parallelism {}",
            config.auth.argon2_memory_kib,
            config.auth.argon2_iterations,
            config.auth.argon2_parallelism
        );
        info!("  Max image size: {} bytes", config.images.max_bytes);
        info!(
            "  Metrics: {}",
            if config.monitoring.metrics_enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        return Ok(());
    }

    let bind_addr = config.server.bind_addr;
    let shutdown_coordinator = ShutdownCoordinator::new(config.server.shutdown_timeout);

    // One session manager for the whole process, injected through the state
    let state = AppState::from_config(config)?;
    let server = ApiServer::new(bind_addr, state);

    let mut server_handle = tokio::spawn(server.start(shutdown_coordinator.shutdown_signal()));

    info!("sessiongate started on {}", bind_addr);
    info!("Press Ctrl+C or send SIGTERM/SIGINT to shutdown gracefully");

    tokio::select! {
        result = shutdown_coordinator.listen_for_signals() => {
            if let Err(e) = result {
                error!("Error setting up signal handlers: {}", e);
                shutdown_coordinator.trigger();
            }
        }
        result = &mut server_handle => {
            // Server exited before any shutdown signal, e.g. the bind failed
            return result.context("Server task failed")?;
        }
    }

    info!("Initiating graceful shutdown...");
    shutdown_coordinator.drain(server_handle).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs, configured_level: &str) -> Result<()> {
    let log_level = if args.verbose {
        "debug"
    } else {
        configured_level
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
