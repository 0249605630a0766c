// src/bin/cli.rs

//! slotwatch CLI
//!
//! Runs one check cycle and exits. Schedule it with cron, a systemd timer
//! or a CI workflow to watch the counter over time.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slotwatch::{
    error::Result,
    models::{Action, Config},
    pipeline::{self, CycleContext},
    services::{self, BarkNotifier},
    storage::{FileStateStore, StateStore},
    utils::http,
};

/// slotwatch - Hosting signup counter watcher
#[derive(Parser, Debug)]
#[command(
    name = "slotwatch",
    version,
    about = "Pushes a notification when a hosting provider's account counter moves"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "slotwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one check cycle (default)
    Check,

    /// Validate configuration
    Validate,

    /// Show the persisted state
    Info,
}

/// Initialize logging; `RUST_LOG` takes precedence over `level`.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let loaded = Config::load_optional(&cli.config);
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(Some(config)), false) => config.logging.level.clone(),
        _ => "info".to_string(),
    };
    init_logging(&level);

    let mut config = match loaded? {
        Some(config) => {
            log::debug!("Loaded configuration from {}", cli.config.display());
            config
        }
        None => {
            log::warn!(
                "Config not found at {}. Using defaults.",
                cli.config.display()
            );
            Config::default()
        }
    };
    config.apply_env();

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let store = FileStateStore::new(&config.state.path);

    match cli.command.unwrap_or(Command::Check) {
        Command::Check => {
            let client = http::create_client(&config.http)?;
            let extractor = services::build_extractor(client.clone(), &config.target)?;
            let notifier = BarkNotifier::new(client, &config.notify);
            if !notifier.is_enabled() {
                log::warn!("No notify key configured; alerts will only be logged.");
            }

            let ctx = CycleContext::from_config(&config);
            let report =
                pipeline::run_cycle(extractor.as_ref(), &store, &notifier, &ctx).await;

            match &report.action {
                Action::Changed { previous, current } => log::info!(
                    "Account count changed: {} -> {} (limit {})",
                    previous.current,
                    current.current,
                    current.limit
                ),
                Action::FirstObservation(reading) => {
                    log::info!("Baseline recorded: {}", reading)
                }
                Action::None => log::info!("No change."),
                Action::ExtractionFailed(e) => {
                    log::warn!("Cycle ended without a reading: {}", e)
                }
            }
            log::debug!(
                "persisted: {}, notified: {}",
                report.persisted,
                report.notified
            );
        }

        Command::Validate => {
            log::info!("✓ Config OK");
            log::info!(
                "Target: {} ({:?}) {}",
                config.target.name,
                config.target.kind,
                config.target.url
            );
            log::info!("State file: {}", store.path().display());
            log::info!(
                "Notifications: {}",
                if config.notify.key.trim().is_empty() {
                    "disabled (no key)"
                } else {
                    "enabled"
                }
            );
        }

        Command::Info => {
            log::info!("State file: {}", store.path().display());
            match store.load().await {
                Ok(Some(stored)) => {
                    match stored.reading() {
                        Some(reading) => log::info!("Last count: {}", reading),
                        None => log::info!("Last count: {} (limit unknown)", stored.current),
                    }
                    if let Some(at) = stored.observed_at {
                        log::info!("Observed at: {}", at.to_rfc3339());
                    }
                }
                Ok(None) => log::info!("No state recorded yet."),
                Err(e) => log::error!("Cannot read state: {}", e),
            }
        }
    }

    Ok(())
}
