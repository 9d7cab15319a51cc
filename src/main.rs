// src/main.rs

//! treadwatch: legal & sanctions update monitor CLI
//!
//! Polls a fixed table of legislation pages and sanctions feeds, diffs the
//! results against the last persisted snapshot, and pushes alerts when
//! something changed.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use treadwatch::{
    error::Result,
    models::{Config, Domain},
    notify::{Notifier, NotifierConfig},
    pipeline,
    storage::{LocalStateStore, StateStore},
    utils::http,
};

/// treadwatch - Legal & Sanctions Update Monitor
#[derive(Parser, Debug)]
#[command(
    name = "treadwatch",
    version,
    about = "Monitors legal texts and sanctions feeds for updates"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one monitoring cycle
    Run,

    /// Aggregate run logs into summary reports
    Export,

    /// Show persisted snapshot state
    Status,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    let store = LocalStateStore::new(&config.paths.state_dir, &config.paths.logs_dir);

    match cli.command {
        Command::Run => {
            let client = http::create_client(&config.monitor)?;
            let notifier = Notifier::new(
                NotifierConfig::from_env(),
                client,
                config.monitor.notify_timeout_secs,
            );
            pipeline::run_monitor(&config, &store, &notifier).await?;
        }

        Command::Export => {
            pipeline::run_export(&config, &store).await?;
        }

        Command::Status => {
            show_status(&store).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} sources)", config.sources.len());
        }
    }

    Ok(())
}

/// Print the last persisted snapshot per domain and the run log count.
async fn show_status(store: &LocalStateStore) -> Result<()> {
    for domain in [Domain::Law, Domain::Sanctions] {
        let snapshot = store.load_previous(domain).await;
        match snapshot.timestamp {
            Some(timestamp) => {
                log::info!("{} snapshot captured at {}", domain, timestamp);
                for (field, value) in &snapshot.fields {
                    log::info!("    {}: {}", field, serde_json::to_string(value)?);
                }
            }
            None => log::info!("{} snapshot: no prior state", domain),
        }
    }

    let logs = store.list_run_logs().await?;
    log::info!("{} run log(s) on disk", logs.len());

    Ok(())
}
