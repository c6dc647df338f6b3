//! The reconciliation store.
//!
//! Owns the on-disk representation of the detail map, the two ID sets,
//! and the catalog, and performs the safe incremental merges that make
//! the pipeline resumable across process restarts.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use steamdex_core::AppId;

use crate::catalog::AppCatalog;
use crate::details::DetailMap;
use crate::error::StoreError;
use crate::id_sets::{self, IdSetKind};
use crate::persistence::{load_json_or_empty, save_json};

/// File name of the detail map artifact.
const DETAILS_FILE: &str = "steam_apps_details.json";

/// File name of the catalog artifact.
const CATALOG_FILE: &str = "steam_apps_dict.json";

/// Durable, idempotent record of reconciliation progress.
///
/// At most one pipeline process should mutate a given data directory
/// at a time; there is no file locking, so concurrent invocations are
/// an operational hazard rather than a handled case.
#[derive(Debug, Clone)]
pub struct ReconcileStore {
    data_dir: PathBuf,
}

impl ReconcileStore {
    /// Creates a store rooted at the given data directory.
    ///
    /// The directory does not need to exist yet; it is created on the
    /// first save.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory this store writes into.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the detail map artifact.
    pub fn details_path(&self) -> PathBuf {
        self.data_dir.join(DETAILS_FILE)
    }

    /// Path of the catalog artifact.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE)
    }

    /// Path of an ID set artifact.
    pub fn id_set_path(&self, kind: IdSetKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    // ========================================================================
    // Detail map
    // ========================================================================

    /// Loads the detail map; missing or malformed file loads empty.
    pub async fn load_details(&self) -> DetailMap {
        DetailMap::from_value(load_json_or_empty(&self.details_path()).await)
    }

    /// Overwrites the detail map artifact with the full map plus a
    /// fresh timestamp.
    ///
    /// Callers must always pass the complete load-merge-save view;
    /// saving a delta here would drop previously resolved entries.
    pub async fn save_details(&self, details: &DetailMap) -> Result<(), StoreError> {
        save_json(&self.details_path(), &details.to_value_with_timestamp()).await?;
        info!(count = details.len(), "Saved detail map");
        Ok(())
    }

    // ========================================================================
    // ID sets
    // ========================================================================

    /// Loads an ID set; missing or malformed file loads empty.
    pub async fn load_ids(&self, kind: IdSetKind) -> BTreeSet<AppId> {
        id_sets::from_value(kind, &load_json_or_empty(&self.id_set_path(kind)).await)
    }

    /// Unions `new_ids` into the persisted set and re-saves it with
    /// refreshed count/timestamp metadata. Duplicates collapse
    /// silently; this is the accumulation mechanism across runs.
    pub async fn merge_ids(
        &self,
        kind: IdSetKind,
        new_ids: &[AppId],
    ) -> Result<BTreeSet<AppId>, StoreError> {
        let mut ids = self.load_ids(kind).await;
        ids.extend(new_ids.iter().copied());
        self.replace_ids(kind, &ids).await?;
        Ok(ids)
    }

    /// Overwrites the persisted set with exactly `ids`.
    ///
    /// A retry sweep uses this for the failed set: the artifact means
    /// "still failing as of now", so IDs that succeeded or became
    /// confirmed-absent must actually disappear from it.
    pub async fn replace_ids(
        &self,
        kind: IdSetKind,
        ids: &BTreeSet<AppId>,
    ) -> Result<(), StoreError> {
        save_json(&self.id_set_path(kind), &id_sets::to_value(kind, ids)).await?;
        info!(kind = ?kind, count = ids.len(), "Saved ID set");
        Ok(())
    }

    // ========================================================================
    // Persist / checkpoint
    // ========================================================================

    /// Persists a full progress snapshot: detail map as whole-file
    /// overwrite, both in-flight ID lists merged into their persisted
    /// sets, then both sets pruned so the three artifacts stay
    /// pairwise disjoint.
    ///
    /// Pruning rules: anything the map now resolves leaves both sets;
    /// an ID this run confirmed absent leaves the failed set; an ID
    /// this run failed leaves the non-existent set (the freshest
    /// classification wins). A stale overlap not touched by this run
    /// resolves toward the non-existent set. Files are only rewritten
    /// when membership actually changed.
    ///
    /// This is the final-save path; errors propagate to the caller.
    pub async fn persist(
        &self,
        details: &DetailMap,
        failed: &[AppId],
        non_existent: &[AppId],
    ) -> Result<(), StoreError> {
        self.save_details(details).await?;

        let existing_failed = self.load_ids(IdSetKind::Failed).await;
        let existing_absent = self.load_ids(IdSetKind::NonExistent).await;

        let mut absent_set = existing_absent.clone();
        absent_set.extend(non_existent.iter().copied());
        for id in failed {
            absent_set.remove(id);
        }
        absent_set.retain(|id| !details.contains(*id));

        let mut failed_set = existing_failed.clone();
        failed_set.extend(failed.iter().copied());
        failed_set.retain(|id| !details.contains(*id) && !absent_set.contains(id));

        if failed_set != existing_failed {
            self.replace_ids(IdSetKind::Failed, &failed_set).await?;
        }
        if absent_set != existing_absent {
            self.replace_ids(IdSetKind::NonExistent, &absent_set).await?;
        }
        Ok(())
    }

    /// Persists a mid-batch snapshot, bounding data loss on crash.
    ///
    /// Any write failure is logged and treated as a skipped
    /// checkpoint; the driver keeps going and the next checkpoint or
    /// the final save retries the persist.
    pub async fn checkpoint(
        &self,
        details: &DetailMap,
        failed: &[AppId],
        non_existent: &[AppId],
        processed: usize,
    ) {
        info!(processed, "Checkpointing progress");

        if let Err(e) = self.persist(details, failed, non_existent).await {
            warn!(error = %e, "Checkpoint skipped, will retry on the next persist");
        }
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Loads the catalog; missing or malformed file loads empty.
    pub async fn load_catalog(&self) -> AppCatalog {
        AppCatalog::from_value(load_json_or_empty(&self.catalog_path()).await)
    }

    /// Overwrites the catalog artifact with a fresh timestamp.
    pub async fn save_catalog(&self, catalog: &AppCatalog) -> Result<(), StoreError> {
        save_json(&self.catalog_path(), &catalog.to_value_with_timestamp()).await?;
        info!(count = catalog.len(), "Saved catalog");
        Ok(())
    }
}
