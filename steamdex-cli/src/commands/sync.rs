//! `steamdex sync` - fetch details for every pending catalog entry.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::time::Duration;
use tracing::info;

use steamdex_fetch::{DetailResolver, SteamClient};
use steamdex_store::{IdSetKind, ReconcileStore};
use steamdex_sync::{plan, BatchConfig, BatchRunner, CancelFlag};

use crate::{Cli, RetryArgs};

/// Arguments for the sync command.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Only fetch the first N pending apps.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Seconds to wait between requests.
    #[arg(long, default_value_t = 0.5)]
    pub delay: f64,

    /// Persist a checkpoint every N fetched apps.
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Retry schedule.
    #[command(flatten)]
    pub retry: RetryArgs,
}

/// Runs a batch sync over the pending work set.
pub async fn run(args: &SyncArgs, cli: &Cli, cancel: CancelFlag) -> Result<()> {
    let store = ReconcileStore::new(cli.data_dir());

    let catalog = store.load_catalog().await;
    if catalog.is_empty() {
        bail!("The local catalog is empty. Run `steamdex catalog` first.");
    }

    let details = store.load_details().await;
    let non_existent = store.load_ids(IdSetKind::NonExistent).await;
    let mut pending = plan::pending_ids(&catalog, &details, &non_existent);
    drop(details);

    if let Some(limit) = args.limit {
        pending.truncate(limit);
        info!(limit, "Work set truncated");
    }

    if pending.is_empty() {
        if !cli.quiet {
            println!("Nothing to fetch; all {} catalog apps are settled.", catalog.len());
        }
        return Ok(());
    }

    let client = SteamClient::with_timeout(Duration::from_secs(args.timeout))
        .context("Failed to build HTTP client")?;
    let resolver = DetailResolver::with_strategy(client, args.retry.strategy());
    let runner = BatchRunner::new(
        resolver,
        BatchConfig {
            request_delay: Duration::from_secs_f64(args.delay),
            checkpoint_every: args.batch_size,
        },
    )
    .with_cancel_flag(cancel);

    let report = runner
        .run(&pending, &store)
        .await
        .context("Sync run failed")?;

    if !cli.quiet {
        println!(
            "Processed {} apps: {} resolved, {} failed, {} absent",
            report.processed,
            report.resolved(),
            report.failed.len(),
            report.non_existent.len()
        );
        if report.skipped > 0 {
            println!("Skipped {} already-resolved apps.", report.skipped);
        }
        if report.cancelled {
            println!("Interrupted; progress is saved, rerun to resume.");
        } else if !report.failed.is_empty() {
            println!("Run `steamdex sweep` to retry the failures.");
        }
    }

    Ok(())
}
