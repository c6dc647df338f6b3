//! `steamdex sweep` - drain the persisted failed set.

use anyhow::{Context, Result};
use clap::Args;
use std::time::Duration;

use steamdex_fetch::{DetailResolver, SteamClient};
use steamdex_store::ReconcileStore;
use steamdex_sync::{BatchConfig, CancelFlag, SweepConfig, SweepOutcome, SweepRunner};

use crate::{Cli, RetryArgs};

/// Arguments for the sweep command.
#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Seconds to wait between sweep iterations.
    #[arg(long, default_value_t = 5)]
    pub wait: u64,

    /// Seconds to wait between requests.
    #[arg(long, default_value_t = 0.5)]
    pub delay: f64,

    /// Persist a checkpoint every N fetched apps.
    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    /// Stop after N consecutive iterations without shrinkage
    /// (0 disables the guard).
    #[arg(long, default_value_t = 3)]
    pub stagnation_limit: u32,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Retry schedule.
    #[command(flatten)]
    pub retry: RetryArgs,
}

/// Runs the sweep until the failed set drains, stalls, or is
/// interrupted.
pub async fn run(args: &SweepArgs, cli: &Cli, cancel: CancelFlag) -> Result<()> {
    let store = ReconcileStore::new(cli.data_dir());

    let client = SteamClient::with_timeout(Duration::from_secs(args.timeout))
        .context("Failed to build HTTP client")?;
    let resolver = DetailResolver::with_strategy(client, args.retry.strategy());
    let runner = SweepRunner::new(
        resolver,
        SweepConfig {
            iteration_wait: Duration::from_secs(args.wait),
            stagnation_limit: args.stagnation_limit,
            batch: BatchConfig {
                request_delay: Duration::from_secs_f64(args.delay),
                checkpoint_every: args.batch_size,
            },
        },
    )
    .with_cancel_flag(cancel);

    let report = runner
        .run_until_empty(&store)
        .await
        .context("Sweep failed")?;

    if !cli.quiet {
        println!(
            "Sweep finished after {} iteration(s): {} recovered, {} confirmed absent, {} still failing",
            report.iterations, report.recovered, report.newly_absent, report.remaining
        );
        match report.outcome {
            SweepOutcome::Drained => println!("Failed set drained."),
            SweepOutcome::Stalled => println!(
                "Failed set stopped shrinking; the remaining {} app(s) look persistently unfetchable.",
                report.remaining
            ),
            SweepOutcome::Cancelled => {
                println!("Interrupted; progress is saved, rerun to continue.");
            }
        }
    }

    Ok(())
}
