//! Work-set planning.
//!
//! Pure file-comparison logic, no API calls: the work set for a sync
//! is the catalog minus everything already resolved or confirmed
//! absent.

use std::collections::BTreeSet;
use tracing::info;

use steamdex_core::AppId;
use steamdex_store::{AppCatalog, DetailMap};

/// Computes the IDs a sync run still needs to fetch, preserving
/// catalog order.
///
/// IDs already in the detail map and IDs in the non-existent set are
/// dropped; the latter are never even attempted again.
pub fn pending_ids(
    catalog: &AppCatalog,
    details: &DetailMap,
    non_existent: &BTreeSet<AppId>,
) -> Vec<AppId> {
    let mut pending = Vec::new();
    let mut resolved = 0usize;
    let mut skipped_absent = 0usize;

    for id in catalog.ids() {
        if details.contains(id) {
            resolved += 1;
        } else if non_existent.contains(&id) {
            skipped_absent += 1;
        } else {
            pending.push(id);
        }
    }

    info!(
        catalog = catalog.len(),
        resolved,
        skipped_absent,
        pending = pending.len(),
        "Computed work set"
    );

    pending
}
