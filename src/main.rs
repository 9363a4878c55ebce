//! Solana Token Monitor - new-token alerts for Telegram
//!
//! Polls token launch feeds, filters fresh liquid tokens and posts each one
//! to a Telegram channel.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use token_monitor::adapters::cli::{CheckCmd, CliApp, Command, RunCmd};
use token_monitor::adapters::telegram::{TelegramConfig, TelegramNotifier};
use token_monitor::application::{run_diagnostics, MonitorSettings, SourceAggregator, TokenMonitor};
use token_monitor::config::{load_config, load_from_env, read_config, Config, LoggingSection};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();

    match app.command {
        Command::Run(cmd) => run_command(cmd, app.verbose, app.debug).await,
        Command::Check(cmd) => check_command(cmd, app.verbose, app.debug).await,
    }
}

/// RUST_LOG wins, then --debug / --verbose, then the configured level
fn init_logging(logging: &LoggingSection, verbose: bool, debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else if verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new(&logging.level)
        }
    });

    let file_layer = if logging.log_to_file {
        let path = Path::new(&logging.log_file);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    Ok(())
}

fn config_path(path: &Option<PathBuf>) -> Option<PathBuf> {
    path.as_ref()
        .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).to_string()))
}

fn load(path: &Option<PathBuf>) -> Result<Config> {
    match config_path(path) {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => load_from_env().context("Failed to load configuration from environment"),
    }
}

async fn run_command(cmd: RunCmd, verbose: bool, debug: bool) -> Result<()> {
    let config = load(&cmd.config)?;
    init_logging(&config.logging, verbose, debug)?;

    tracing::info!("Starting Solana Token Monitor...");
    tracing::info!(
        "Max age: {} min, min liquidity: ${}, min market cap: ${}",
        config.monitor.max_age_minutes,
        config.monitor.min_liquidity_usd,
        config.monitor.min_market_cap_usd
    );

    let aggregator = SourceAggregator::from_config(&config)
        .context("Failed to create token sources")?;
    if aggregator.enabled_sources().is_empty() {
        tracing::warn!("No API keys configured - relying on the RPC scan only");
    }

    let telegram = TelegramConfig::new(&config.telegram.bot_token, &config.telegram.channel_id)
        .with_api_url(config.telegram.api_url.clone())
        .with_timeout(config.request_timeout());
    let notifier = TelegramNotifier::new(telegram).context("Failed to create Telegram notifier")?;

    let monitor = Arc::new(TokenMonitor::new(
        aggregator,
        Arc::new(notifier),
        config.thresholds(),
        MonitorSettings {
            interval: config.check_interval(),
            announce_startup: config.monitor.announce_startup,
        },
    ));

    monitor.start().await.context("Failed to start monitor")?;
    tracing::info!("Bot started successfully!");

    monitor
        .run(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await;

    tracing::info!("Solana Token Monitor stopped");
    Ok(())
}

async fn check_command(cmd: CheckCmd, verbose: bool, debug: bool) -> Result<()> {
    // Unvalidated so that missing settings show up in the report
    let config = read_config(config_path(&cmd.config).as_deref())
        .context("Failed to read configuration")?;
    init_logging(&config.logging, verbose, debug)?;

    let report = run_diagnostics(&config, cmd.send_test).await;
    println!("{}", report);

    if report.has_failures() {
        bail!("Configuration check failed");
    }
    Ok(())
}
