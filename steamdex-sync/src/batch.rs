//! The batch driver.
//!
//! Walks an ordered work set one request at a time, converts every
//! per-ID outcome into set membership, and checkpoints periodically so
//! a crash loses at most the current batch's un-checkpointed progress.

use std::time::Duration;
use tracing::{debug, info};

use steamdex_core::{AppId, Resolution};
use steamdex_fetch::{DetailFetcher, DetailResolver};
use steamdex_store::{DetailMap, ReconcileStore};

use crate::cancel::CancelFlag;
use crate::error::SyncError;

/// Batch driver tuning knobs.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Fixed wait between consecutive requests. This is the sole
    /// rate-limiting mechanism; requests are strictly serial.
    pub request_delay: Duration,
    /// Checkpoint after this many processed items.
    pub checkpoint_every: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(500),
            checkpoint_every: 100,
        }
    }
}

/// A full sync whose first this-many fetches all hard-fail aborts
/// with [`SyncError::RemoteUnreachable`] instead of grinding through
/// the whole catalog. Retry passes are exempt: a sweep's input is
/// failures by definition.
const INITIAL_FAILURE_ABORT: usize = 3;

/// What one driver run accomplished.
#[derive(Debug)]
pub struct BatchReport {
    /// The full detail map after this run (loaded state plus anything
    /// resolved now).
    pub details: DetailMap,
    /// IDs that exhausted their retries *this run*.
    pub failed: Vec<AppId>,
    /// IDs confirmed absent *this run*.
    pub non_existent: Vec<AppId>,
    /// IDs actually fetched this run.
    pub processed: usize,
    /// IDs skipped because they were already resolved.
    pub skipped: usize,
    /// True if the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl BatchReport {
    /// IDs newly resolved this run.
    pub fn resolved(&self) -> usize {
        self.processed - self.failed.len() - self.non_existent.len()
    }
}

/// Drives a work set through the resolver, strictly serially.
pub struct BatchRunner<F> {
    resolver: DetailResolver<F>,
    config: BatchConfig,
    cancel: CancelFlag,
    retry_pass: bool,
}

impl<F: DetailFetcher> BatchRunner<F> {
    /// Creates a runner over the given resolver.
    pub fn new(resolver: DetailResolver<F>, config: BatchConfig) -> Self {
        Self {
            resolver,
            config,
            cancel: CancelFlag::new(),
            retry_pass: false,
        }
    }

    /// Attaches a shared cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Marks this runner as a retry pass over previously failed IDs
    /// (affects logging context only).
    pub fn as_retry_pass(mut self) -> Self {
        self.retry_pass = true;
        self
    }

    /// Runs the driver over `app_ids`, in order.
    ///
    /// Loads the detail map as the resume point, skips anything it
    /// already resolves without spending a remote call, and ends with
    /// one full persist. An empty input returns right after the
    /// initial load without touching the disk again.
    pub async fn run(
        &self,
        app_ids: &[AppId],
        store: &ReconcileStore,
    ) -> Result<BatchReport, SyncError> {
        let details = store.load_details().await;
        if !details.is_empty() {
            info!(resolved = details.len(), "Resuming from existing detail map");
        }

        if app_ids.is_empty() {
            debug!("Empty work set, nothing to do");
            return Ok(BatchReport {
                details,
                failed: Vec::new(),
                non_existent: Vec::new(),
                processed: 0,
                skipped: 0,
                cancelled: false,
            });
        }

        let mut report = BatchReport {
            details,
            failed: Vec::new(),
            non_existent: Vec::new(),
            processed: 0,
            skipped: 0,
            cancelled: false,
        };

        let total = app_ids.len();
        let checkpoint_every = self.config.checkpoint_every.max(1);

        info!(
            total,
            delay_ms = self.config.request_delay.as_millis() as u64,
            checkpoint_every,
            retry_pass = self.retry_pass,
            "Starting fetch run"
        );

        for (i, &app_id) in app_ids.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(position = i, total, "Cancellation requested, stopping after persist");
                report.cancelled = true;
                break;
            }

            if report.details.contains(app_id) {
                debug!(app_id, "Already resolved, skipping");
                report.skipped += 1;
                continue;
            }

            info!(
                app_id,
                position = i + 1,
                total,
                retry_pass = self.retry_pass,
                "Fetching app details"
            );

            match self.resolver.resolve(app_id).await {
                Resolution::Resolved(record) => {
                    report.details.insert(app_id, record);
                }
                Resolution::Absent => {
                    report.non_existent.push(app_id);
                }
                Resolution::Failed => {
                    report.failed.push(app_id);
                }
            }
            report.processed += 1;

            if !self.retry_pass
                && report.processed >= INITIAL_FAILURE_ABORT
                && report.failed.len() == report.processed
            {
                store
                    .persist(&report.details, &report.failed, &report.non_existent)
                    .await?;
                return Err(SyncError::RemoteUnreachable {
                    attempted: report.processed,
                });
            }

            if report.processed % checkpoint_every == 0 {
                store
                    .checkpoint(
                        &report.details,
                        &report.failed,
                        &report.non_existent,
                        report.processed,
                    )
                    .await;
            }

            // No wait after the last item.
            if i + 1 < total {
                tokio::time::sleep(self.config.request_delay).await;
            }
        }

        store
            .persist(&report.details, &report.failed, &report.non_existent)
            .await?;

        info!(
            resolved = report.resolved(),
            failed = report.failed.len(),
            non_existent = report.non_existent.len(),
            skipped = report.skipped,
            cancelled = report.cancelled,
            "Fetch run finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubFetcher, StubStep};
    use serde_json::json;
    use steamdex_fetch::RetryStrategy;
    use steamdex_store::IdSetKind;
    use tempfile::TempDir;

    fn runner(fetcher: &StubFetcher, max_attempts: u32) -> BatchRunner<&StubFetcher> {
        let strategy = RetryStrategy::new(max_attempts).with_base_delay(0);
        BatchRunner::new(
            DetailResolver::with_strategy(fetcher, strategy),
            BatchConfig {
                request_delay: Duration::ZERO,
                checkpoint_every: 100,
            },
        )
    }

    #[tokio::test]
    async fn test_success_absent_and_failure_land_in_their_sets() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let fetcher = StubFetcher::new()
            .with_record(1, json!({"name": "one"}))
            .with_absent(2)
            .with_failures(3);

        let report = runner(&fetcher, 2).run(&[1, 2, 3], &store).await.unwrap();

        assert!(report.details.contains(1));
        assert_eq!(report.non_existent, vec![2]);
        assert_eq!(report.failed, vec![3]);
        assert_eq!(report.resolved(), 1);

        // Persisted artifacts match the report.
        assert!(store.load_details().await.contains(1));
        assert_eq!(store.load_ids(IdSetKind::NonExistent).await, [2].into_iter().collect());
        assert_eq!(store.load_ids(IdSetKind::Failed).await, [3].into_iter().collect());
    }

    #[tokio::test]
    async fn test_resumed_run_spends_no_calls_on_resolved_ids() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let first = StubFetcher::new()
            .with_record(1, json!({"a": 1}))
            .with_record(2, json!({"b": 2}));
        runner(&first, 2).run(&[1, 2], &store).await.unwrap();

        let second = StubFetcher::new()
            .with_record(1, json!({"a": 1}))
            .with_record(2, json!({"b": 2}));
        let report = runner(&second, 2).run(&[1, 2], &store).await.unwrap();

        assert!(second.calls().is_empty());
        assert_eq!(report.skipped, 2);
        assert_eq!(report.processed, 0);
    }

    #[tokio::test]
    async fn test_retries_consumed_only_by_retryable_errors() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        // 77 is rate limited exactly twice, then succeeds.
        let fetcher = StubFetcher::new().with_script(
            77,
            vec![StubStep::RateLimit, StubStep::RateLimit, StubStep::Found(json!({"ok": true}))],
        );

        let report = runner(&fetcher, 8).run(&[77], &store).await.unwrap();

        assert_eq!(fetcher.call_count(77), 3);
        assert!(report.details.contains(77));
        assert!(report.failed.is_empty());
        assert!(report.non_existent.is_empty());
    }

    #[tokio::test]
    async fn test_absent_id_is_never_retried() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let fetcher = StubFetcher::new().with_absent(99);
        let report = runner(&fetcher, 8).run(&[99], &store).await.unwrap();

        assert_eq!(fetcher.call_count(99), 1);
        assert_eq!(report.non_existent, vec![99]);
        assert!(store.load_ids(IdSetKind::Failed).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_performs_no_writes() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let fetcher = StubFetcher::new();
        let report = runner(&fetcher, 2).run(&[], &store).await.unwrap();

        assert_eq!(report.processed, 0);
        assert!(!store.details_path().exists());
        assert!(!store.id_set_path(IdSetKind::Failed).exists());
    }

    #[tokio::test]
    async fn test_cancellation_stops_early_but_persists() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let fetcher = StubFetcher::new().with_record(1, json!({"x": 1}));
        let cancel = CancelFlag::new();
        cancel.cancel();

        let report = runner(&fetcher, 2)
            .with_cancel_flag(cancel)
            .run(&[1, 2, 3], &store)
            .await
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.processed, 0);
        assert!(fetcher.calls().is_empty());
        // The final persist still ran.
        assert!(store.details_path().exists());
    }

    #[tokio::test]
    async fn test_final_save_failure_is_surfaced() {
        // Rooting the store under a regular file makes writes fail.
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, "x").await.unwrap();
        let store = ReconcileStore::new(blocker.join("nested"));

        let fetcher = StubFetcher::new().with_record(1, json!({}));
        let result = runner(&fetcher, 2).run(&[1], &store).await;

        assert!(matches!(result, Err(SyncError::FinalSave(_))));
    }

    #[tokio::test]
    async fn test_all_initial_fetches_failing_aborts_the_run() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let fetcher = StubFetcher::new()
            .with_failures(1)
            .with_failures(2)
            .with_failures(3)
            .with_record(4, json!({"never": "reached"}));

        let result = runner(&fetcher, 2).run(&[1, 2, 3, 4], &store).await;

        assert!(matches!(
            result,
            Err(SyncError::RemoteUnreachable { attempted: 3 })
        ));
        // 4 was never attempted, and the three failures were
        // persisted before aborting.
        assert_eq!(fetcher.call_count(4), 0);
        assert_eq!(
            store.load_ids(IdSetKind::Failed).await,
            [1, 2, 3].into_iter().collect()
        );
    }

    #[tokio::test]
    async fn test_retry_pass_is_exempt_from_the_unreachable_abort() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let fetcher = StubFetcher::new()
            .with_failures(1)
            .with_failures(2)
            .with_failures(3)
            .with_failures(4);

        let report = runner(&fetcher, 2)
            .as_retry_pass()
            .run(&[1, 2, 3, 4], &store)
            .await
            .unwrap();

        assert_eq!(report.failed, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_checkpointing_persists_mid_run_progress() {
        let dir = TempDir::new().unwrap();
        let store = ReconcileStore::new(dir.path());

        let fetcher = StubFetcher::new()
            .with_record(1, json!({"n": 1}))
            .with_record(2, json!({"n": 2}))
            .with_absent(3);

        let strategy = RetryStrategy::no_retry();
        let config = BatchConfig {
            request_delay: Duration::ZERO,
            checkpoint_every: 1,
        };
        let report = BatchRunner::new(DetailResolver::with_strategy(&fetcher, strategy), config)
            .run(&[1, 2, 3], &store)
            .await
            .unwrap();

        assert_eq!(report.processed, 3);
        let persisted = store.load_details().await;
        assert_eq!(persisted.len(), 2);
        assert_eq!(store.load_ids(IdSetKind::NonExistent).await, [3].into_iter().collect());
    }
}
