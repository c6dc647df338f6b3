//! Sync error types.

use thiserror::Error;

/// Errors surfaced by the drivers.
///
/// Per-ID fetch failures are absorbed into set membership and never
/// appear here; the only user-visible failure mode of a driver run is
/// being unable to persist its results at the end.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The final save after exhausting the input could not be
    /// persisted. The run completed logically but its progress may be
    /// lost; operators need to know.
    #[error("Final save failed: {0}")]
    FinalSave(#[from] steamdex_store::StoreError),

    /// Every one of the first few fetched apps exhausted its retries.
    /// The remote host is most likely unreachable, so continuing
    /// would only pad the failed set.
    #[error("The first {attempted} fetches all failed; remote host looks unreachable")]
    RemoteUnreachable {
        /// How many apps were attempted before giving up.
        attempted: usize,
    },
}
