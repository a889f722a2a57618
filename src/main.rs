//! Proofmark - grammar-correction overlay for editable text fields
//!
//! Main entry point for the Proofmark CLI.

use std::path::Path;

use clap::Parser;
use tracing::debug;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use proofmark_config::{ConfigLoader, LoggingConfig};

mod cli;
mod cmd_check;
mod cmd_config;
mod cmd_replay;
mod register;

use cli::{Cli, Commands};
use cmd_check::handle_check;
use cmd_config::handle_config_command;
use cmd_replay::handle_replay;

/// Initialize tracing with console output and, when a log directory is
/// configured, a daily rolling log file.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // Console goes to stderr so command output stays clean on stdout.
    let registry = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_writer(std::io::stderr),
    );

    match &logging.directory {
        Some(dir) => {
            let writer = file_writer(dir)?;
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
        }
        None => registry.init(),
    }

    Ok(())
}

fn file_writer(dir: &Path) -> Result<NonBlocking, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("proofmark")
        .filename_suffix("log")
        .max_log_files(14)
        .build(dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the writer on drop; keep it for the whole process.
    static GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    Ok(non_blocking)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    init_tracing(&config.logging)?;
    debug!("Proofmark v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Check { text, stdin } => handle_check(&config, text, stdin).await,
        Commands::Replay { script } => handle_replay(&config, &script).await,
        Commands::Config { action } => handle_config_command(action, cli.config.as_deref()),
    }
}
