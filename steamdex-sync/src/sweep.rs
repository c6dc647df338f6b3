//! The retry-sweep driver.
//!
//! Mops up after transient outages: repeatedly re-runs the batch
//! driver over the persisted failed set until it drains. Each
//! iteration *replaces* the failed artifact with what is still failing
//! now, so recovered and confirmed-absent IDs actually disappear from
//! it; absences are merged into the append-only non-existent set.

use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use steamdex_core::AppId;
use steamdex_fetch::{DetailFetcher, DetailResolver};
use steamdex_store::{IdSetKind, ReconcileStore};

use crate::batch::{BatchConfig, BatchRunner};
use crate::cancel::CancelFlag;
use crate::error::SyncError;

/// Sweep driver tuning knobs.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Wait between iterations, applied only when the replacement
    /// failed set is non-empty.
    pub iteration_wait: Duration,
    /// Stop after this many consecutive iterations in which the
    /// failed set did not shrink. Zero disables the guard and the
    /// loop runs until drained or interrupted.
    pub stagnation_limit: u32,
    /// Per-iteration batch settings.
    pub batch: BatchConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            iteration_wait: Duration::from_secs(5),
            stagnation_limit: 3,
            batch: BatchConfig {
                request_delay: Duration::from_millis(500),
                checkpoint_every: 50,
            },
        }
    }
}

/// How a sweep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The failed set is empty.
    Drained,
    /// The failed set stopped shrinking and the stagnation guard
    /// tripped.
    Stalled,
    /// A cancellation request stopped the sweep; progress so far is
    /// persisted.
    Cancelled,
}

/// Summary of a whole sweep.
#[derive(Debug)]
pub struct SweepReport {
    /// How the sweep ended.
    pub outcome: SweepOutcome,
    /// Iterations executed.
    pub iterations: u32,
    /// IDs recovered into the detail map across all iterations.
    pub recovered: usize,
    /// IDs newly confirmed absent across all iterations.
    pub newly_absent: usize,
    /// IDs still failing when the sweep ended.
    pub remaining: usize,
}

/// Re-runs the batch driver over the persisted failed set until it
/// empties, stalls, or is interrupted.
pub struct SweepRunner<F> {
    runner: BatchRunner<F>,
    iteration_wait: Duration,
    stagnation_limit: u32,
    cancel: CancelFlag,
}

impl<F: DetailFetcher> SweepRunner<F> {
    /// Creates a sweep runner over the given resolver.
    pub fn new(resolver: DetailResolver<F>, config: SweepConfig) -> Self {
        let cancel = CancelFlag::new();
        let runner = BatchRunner::new(resolver, config.batch)
            .as_retry_pass()
            .with_cancel_flag(cancel.clone());
        Self {
            runner,
            iteration_wait: config.iteration_wait,
            stagnation_limit: config.stagnation_limit,
            cancel,
        }
    }

    /// Attaches a shared cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.runner = self.runner.with_cancel_flag(cancel.clone());
        self.cancel = cancel;
        self
    }

    /// Runs sweep iterations until the persisted failed set is empty.
    pub async fn run_until_empty(&self, store: &ReconcileStore) -> Result<SweepReport, SyncError> {
        let mut iterations = 0u32;
        let mut stagnant = 0u32;
        let mut recovered = 0usize;
        let mut newly_absent = 0usize;

        loop {
            let failed = store.load_ids(IdSetKind::Failed).await;
            if failed.is_empty() {
                info!(iterations, recovered, newly_absent, "Failed set drained, sweep complete");
                return Ok(SweepReport {
                    outcome: SweepOutcome::Drained,
                    iterations,
                    recovered,
                    newly_absent,
                    remaining: 0,
                });
            }

            if self.cancel.is_cancelled() {
                info!(remaining = failed.len(), "Cancellation requested, stopping sweep");
                return Ok(SweepReport {
                    outcome: SweepOutcome::Cancelled,
                    iterations,
                    recovered,
                    newly_absent,
                    remaining: failed.len(),
                });
            }

            iterations += 1;
            let before = failed.len();
            info!(iteration = iterations, failed = before, "Starting retry sweep iteration");

            // A prior partial run may have resolved some of these IDs
            // without clearing the failed entry yet; drop them without
            // re-fetching.
            let details = store.load_details().await;
            let ids: Vec<AppId> = failed
                .iter()
                .copied()
                .filter(|id| !details.contains(*id))
                .collect();
            if ids.len() < before {
                info!(dropped = before - ids.len(), "Dropping already-resolved IDs from failed set");
            }

            let report = self.runner.run(&ids, store).await?;

            // Replacement semantics: the failed artifact means "still
            // failing as of now". Unattempted IDs (after a
            // cancellation) stay in it; resolved and absent ones drop
            // out.
            let absent: BTreeSet<AppId> = report.non_existent.iter().copied().collect();
            let still: BTreeSet<AppId> = ids
                .iter()
                .copied()
                .filter(|id| !report.details.contains(*id) && !absent.contains(id))
                .collect();
            store
                .replace_ids(IdSetKind::Failed, &still)
                .await
                .map_err(SyncError::FinalSave)?;

            recovered += report.resolved();
            newly_absent += absent.len();

            info!(
                iteration = iterations,
                resolved = report.resolved(),
                newly_absent = absent.len(),
                still_failing = still.len(),
                "Sweep iteration finished"
            );

            if report.cancelled {
                return Ok(SweepReport {
                    outcome: SweepOutcome::Cancelled,
                    iterations,
                    recovered,
                    newly_absent,
                    remaining: still.len(),
                });
            }

            if still.len() >= before {
                stagnant += 1;
                if self.stagnation_limit > 0 && stagnant >= self.stagnation_limit {
                    warn!(
                        iterations,
                        remaining = still.len(),
                        "Failed set is not shrinking, stopping sweep"
                    );
                    return Ok(SweepReport {
                        outcome: SweepOutcome::Stalled,
                        iterations,
                        recovered,
                        newly_absent,
                        remaining: still.len(),
                    });
                }
            } else {
                stagnant = 0;
            }

            if !still.is_empty() {
                debug!(wait_ms = self.iteration_wait.as_millis() as u64, "Waiting before next iteration");
                tokio::time::sleep(self.iteration_wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubFetcher, StubStep};
    use serde_json::json;
    use steamdex_fetch::RetryStrategy;
    use steamdex_store::DetailMap;
    use tempfile::TempDir;

    fn sweep_config(stagnation_limit: u32) -> SweepConfig {
        SweepConfig {
            iteration_wait: Duration::ZERO,
            stagnation_limit,
            batch: BatchConfig {
                request_delay: Duration::ZERO,
                checkpoint_every: 100,
            },
        }
    }

    fn sweeper(fetcher: &StubFetcher, stagnation_limit: u32) -> SweepRunner<&StubFetcher> {
        let strategy = RetryStrategy::no_retry();
        SweepRunner::new(
            DetailResolver::with_strategy(fetcher, strategy),
            sweep_config(stagnation_limit),
        )
    }

    #[tokio::test]
    async fn test_replacement_semantics() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());
        store.merge_ids(IdSetKind::Failed, &[10, 20, 30]).await.unwrap();

        // 10 recovers, 20 turns out absent, 30 keeps failing.
        let fetcher = StubFetcher::new()
            .with_record(10, json!({"name": "ten"}))
            .with_absent(20)
            .with_failures(30);

        let report = sweeper(&fetcher, 1).run_until_empty(&store).await.unwrap();

        assert_eq!(report.outcome, SweepOutcome::Stalled);
        assert_eq!(report.recovered, 1);
        assert_eq!(report.newly_absent, 1);

        // The failed artifact is exactly {30}, not a union with the
        // old set.
        assert_eq!(store.load_ids(IdSetKind::Failed).await, [30].into_iter().collect());
        assert_eq!(store.load_ids(IdSetKind::NonExistent).await, [20].into_iter().collect());
        assert!(store.load_details().await.contains(10));
    }

    #[tokio::test]
    async fn test_already_resolved_ids_are_dropped_without_fetching() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let mut details = DetailMap::new();
        details.insert(5, json!({"name": "five"}));
        store.save_details(&details).await.unwrap();
        store.merge_ids(IdSetKind::Failed, &[5]).await.unwrap();

        let fetcher = StubFetcher::new();
        let report = sweeper(&fetcher, 3).run_until_empty(&store).await.unwrap();

        assert_eq!(report.outcome, SweepOutcome::Drained);
        assert_eq!(report.recovered, 0);
        assert!(fetcher.calls().is_empty());
        assert!(store.load_ids(IdSetKind::Failed).await.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_drains_when_everything_recovers() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());
        store.merge_ids(IdSetKind::Failed, &[1, 2]).await.unwrap();

        let fetcher = StubFetcher::new()
            .with_record(1, json!({"n": 1}))
            .with_record(2, json!({"n": 2}));

        let report = sweeper(&fetcher, 3).run_until_empty(&store).await.unwrap();

        assert_eq!(report.outcome, SweepOutcome::Drained);
        assert_eq!(report.iterations, 1);
        assert_eq!(report.recovered, 2);
        assert!(store.load_ids(IdSetKind::Failed).await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_guard_keeps_looping_until_drained() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());
        store.merge_ids(IdSetKind::Failed, &[30]).await.unwrap();

        // Fails twice across iterations, then recovers.
        let fetcher = StubFetcher::new().with_script(
            30,
            vec![StubStep::Fail, StubStep::Fail, StubStep::Found(json!({"ok": true}))],
        );

        let report = sweeper(&fetcher, 0).run_until_empty(&store).await.unwrap();

        assert_eq!(report.outcome, SweepOutcome::Drained);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.recovered, 1);
    }

    #[tokio::test]
    async fn test_cancellation_before_first_iteration() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());
        store.merge_ids(IdSetKind::Failed, &[1, 2]).await.unwrap();

        let fetcher = StubFetcher::new();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let report = sweeper(&fetcher, 3)
            .with_cancel_flag(cancel)
            .run_until_empty(&store)
            .await
            .unwrap();

        assert_eq!(report.outcome, SweepOutcome::Cancelled);
        assert_eq!(report.remaining, 2);
        assert!(fetcher.calls().is_empty());
        // Nothing was lost from the persisted failed set.
        assert_eq!(store.load_ids(IdSetKind::Failed).await.len(), 2);
    }
}
