// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! steamdex CLI - resumable Steam catalog harvesting.
//!
//! # Examples
//!
//! ```bash
//! # Refresh the local catalog enumeration
//! steamdex catalog
//!
//! # Fetch details for everything still pending
//! steamdex sync
//!
//! # Dev run: only the first 200 pending apps, faster cadence
//! steamdex sync --limit 200 --delay 0.1
//!
//! # Re-attempt everything that failed until the set drains
//! steamdex sweep
//!
//! # Inspect reconciliation progress
//! steamdex status
//! ```

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use steamdex_fetch::RetryStrategy;
use steamdex_sync::CancelFlag;

use commands::{catalog, status, sweep, sync};

// ============================================================================
// CLI Definition
// ============================================================================

/// steamdex - turn the Steam catalog into a local JSON dataset.
#[derive(Parser)]
#[command(name = "steamdex")]
#[command(about = "Resumable Steam catalog harvester")]
#[command(long_about = r#"
steamdex enumerates the Steam catalog, fetches per-app detail records,
and reconciles them into three durable JSON artifacts: resolved
details, still-failing IDs, and confirmed-absent IDs. Runs are safe to
interrupt and resume; progress only ever moves forward.

Typical flow:
  steamdex catalog     # enumerate app IDs
  steamdex sync        # fetch details (resumable)
  steamdex sweep       # mop up transient failures
  steamdex status      # gauge completeness
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding the JSON artifacts.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// The resolved data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(steamdex_store::default_data_dir)
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the app list and merge it into the local catalog.
    Catalog(catalog::CatalogArgs),

    /// Fetch details for every pending catalog entry.
    Sync(sync::SyncArgs),

    /// Re-run the failed set until it drains.
    Sweep(sweep::SweepArgs),

    /// Show reconciliation progress.
    Status,
}

/// Retry schedule flags shared by sync and sweep.
#[derive(Debug, Args)]
pub struct RetryArgs {
    /// Maximum attempts per app (including the first).
    #[arg(long, default_value_t = 8)]
    pub retries: u32,

    /// Delay before the second attempt, in seconds.
    #[arg(long, default_value_t = 1)]
    pub retry_delay: u64,

    /// Backoff multiplier per attempt.
    #[arg(long, default_value_t = 2)]
    pub backoff: u64,

    /// Cap on any single retry delay, in seconds.
    #[arg(long, default_value_t = 120)]
    pub max_retry_delay: u64,
}

impl RetryArgs {
    /// Builds the retry strategy these flags describe.
    pub fn strategy(&self) -> RetryStrategy {
        RetryStrategy::new(self.retries)
            .with_base_delay(self.retry_delay)
            .with_backoff_factor(self.backoff)
            .with_max_delay(self.max_retry_delay)
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("steamdex=debug,info")
    } else {
        EnvFilter::new("steamdex=info,warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

// Current-thread runtime on purpose: request issuance is strictly
// serial, one in flight at a time.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Ctrl-C requests a graceful stop: drivers finish the current item
    // and persist before returning.
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after the current item");
                cancel.cancel();
            }
        });
    }

    let result = match &cli.command {
        Commands::Catalog(args) => catalog::run(args, &cli).await,
        Commands::Sync(args) => sync::run(args, &cli, cancel).await,
        Commands::Sweep(args) => sweep::run(args, &cli, cancel).await,
        Commands::Status => status::run(&cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }

    Ok(())
}
