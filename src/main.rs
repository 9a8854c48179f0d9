use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use unified_console::backend::{Backend, HttpBackend};
use unified_console::config::{self, ConsoleConfig};
use unified_console::shell::Tab;
use unified_console::tui::runner::run_tui;

/// Panel to open on startup.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StartTab {
    Database,
    Scripts,
    Prompt,
    Python,
}

impl From<StartTab> for Tab {
    fn from(tab: StartTab) -> Self {
        match tab {
            StartTab::Database => Tab::Database,
            StartTab::Scripts => Tab::Scripts,
            StartTab::Prompt => Tab::Prompt,
            StartTab::Python => Tab::Python,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "unified-console",
    about = "Terminal console for the unified backend: SQL, scripts, prompts, Python."
)]
struct Cli {
    /// Backend base URL (overrides config and environment)
    #[arg(short, long)]
    backend_url: Option<String>,

    /// Config file to use instead of the standard locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Panel to open first
    #[arg(long, value_enum, default_value_t = StartTab::Database)]
    tab: StartTab,

    /// Log file (the terminal belongs to the TUI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: PathBuf) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("unified_console=info".parse()?),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(|| {
        config::user_dir()
            .unwrap_or_else(|| PathBuf::from(".unified-console"))
            .join("console.log")
    });
    init_logging(log_path)?;

    let mut config = ConsoleConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    if cli.timeout.is_some() {
        config.request_timeout_secs = cli.timeout;
    }
    config.validate()?;

    info!(
        backend = %config.backend_url,
        timeout_secs = ?config.request_timeout_secs,
        "unified-console starting"
    );

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::from_config(&config)?);
    run_tui(&config, backend, cli.tab.into()).await
}
