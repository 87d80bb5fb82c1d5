use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pint_server::api;
use pint_server::catalog::Catalog;
use pint_server::config::Config;
use pint_server::framework::load_from_pattern;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Public Cloud Information Server
#[derive(Parser, Debug)]
#[command(name = "pint-server", version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "PINT_BIND")]
    bind: Option<String>,

    /// Glob pattern of the framework documents to serve
    #[arg(short, long, env = "PINT_FRAMEWORK")]
    framework: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Write logs to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let Some(log_path) = log_file else {
        tracing_subscriber::fmt()
            .with_max_level(tracing_level)
            .with_target(true)
            .init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;
    tracing::info!(
        "pint-server {} started with log level: {:?}",
        pint_server::VERSION,
        args.log_level
    );

    let config = Config::load(args.config.as_deref())?;
    let pattern = config.effective_framework(args.framework.as_deref());
    let bind = config.effective_bind(args.bind.as_deref());

    let store = load_from_pattern(&pattern);
    if store.is_empty() {
        tracing::warn!("No providers loaded from {}", pattern);
    }

    let catalog = Arc::new(Catalog::new(store, config.settings()));

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    api::serve(listener, api::router(catalog)).await
}
