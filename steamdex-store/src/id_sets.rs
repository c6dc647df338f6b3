//! The failed and non-existent ID set artifacts.
//!
//! Both are persisted as
//! `{"<kind>_app_ids": [...], "count": n, "exported_at": iso,
//! "description": str}` so operators can gauge completeness at a
//! glance.

use chrono::Utc;
use serde_json::{json, Value};
use std::collections::BTreeSet;

use steamdex_core::AppId;

/// Which ID set artifact an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSetKind {
    /// Last attempt ended in an unrecovered transport/server failure.
    Failed,
    /// The API explicitly reported no entry / no usable data.
    NonExistent,
}

impl IdSetKind {
    /// File name of this artifact inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Failed => "failed_app_ids.json",
            Self::NonExistent => "non_existent_apps.json",
        }
    }

    /// JSON key holding the ID array.
    pub fn json_key(self) -> &'static str {
        match self {
            Self::Failed => "failed_app_ids",
            Self::NonExistent => "non_existent_app_ids",
        }
    }

    /// Human-readable description written into the artifact.
    pub fn description(self) -> &'static str {
        match self {
            Self::Failed => "App IDs that failed after all retry attempts",
            Self::NonExistent => "App IDs that do not exist or have no data in Steam",
        }
    }
}

/// Serializes an ID set with its count/timestamp/description metadata.
pub fn to_value(kind: IdSetKind, ids: &BTreeSet<AppId>) -> Value {
    json!({
        kind.json_key(): ids.iter().copied().collect::<Vec<_>>(),
        "count": ids.len(),
        "exported_at": Utc::now().to_rfc3339(),
        "description": kind.description(),
    })
}

/// Parses a persisted ID set value. Anything unexpected yields an
/// empty set; out-of-range entries are dropped; duplicates collapse.
pub fn from_value(kind: IdSetKind, value: &Value) -> BTreeSet<AppId> {
    value[kind.json_key()]
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_u64)
                .filter_map(|id| AppId::try_from(id).ok())
                .collect()
        })
        .unwrap_or_default()
}
