//! The catalog enumeration artifact (`steam_apps_dict.json`).

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

use steamdex_core::{app_key, parse_app_key, AppEntry, AppId};

use crate::details::RESERVED_TIMESTAMP_KEY;

/// ID -> name mapping of the full remote catalog.
///
/// Built from the app-list endpoint and merged monotonically: a
/// refresh only ever adds entries, so IDs that vanish upstream stay
/// queryable locally.
#[derive(Debug, Clone, Default)]
pub struct AppCatalog {
    entries: BTreeMap<AppId, String>,
}

impl AppCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a persisted JSON value, stripping the
    /// reserved timestamp key and skipping non-numeric keys.
    pub fn from_value(value: Value) -> Self {
        let mut entries = BTreeMap::new();
        if let Value::Object(obj) = value {
            for (key, name) in obj {
                if key == RESERVED_TIMESTAMP_KEY {
                    continue;
                }
                if let Ok(id) = parse_app_key(&key) {
                    entries.insert(id, name.as_str().unwrap_or_default().to_string());
                }
            }
        }
        Self { entries }
    }

    /// Serializes the catalog plus a fresh timestamp for persisting.
    pub fn to_value_with_timestamp(&self) -> Value {
        let mut obj = serde_json::Map::new();
        for (id, name) in &self.entries {
            obj.insert(app_key(*id), Value::String(name.clone()));
        }
        obj.insert(
            RESERVED_TIMESTAMP_KEY.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Value::Object(obj)
    }

    /// Merges freshly enumerated entries, returning how many were new.
    /// Existing entries are never overwritten or dropped.
    pub fn merge(&mut self, entries: &[AppEntry]) -> usize {
        let mut added = 0;
        for entry in entries {
            if !self.entries.contains_key(&entry.appid) {
                self.entries.insert(entry.appid, entry.name.clone());
                added += 1;
            }
        }
        added
    }

    /// The catalog IDs in ascending order; this is the canonical walk
    /// order for a full sync.
    pub fn ids(&self) -> Vec<AppId> {
        self.entries.keys().copied().collect()
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(appid: AppId, name: &str) -> AppEntry {
        AppEntry {
            appid,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_merge_is_monotonic() {
        let mut catalog = AppCatalog::new();
        assert_eq!(catalog.merge(&[entry(10, "Counter-Strike"), entry(20, "TFC")]), 2);
        // Re-merging with a renamed entry adds nothing and keeps the
        // original name.
        assert_eq!(catalog.merge(&[entry(10, "CS renamed"), entry(30, "Day of Defeat")]), 1);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.ids(), vec![10, 20, 30]);
    }

    #[test]
    fn test_from_value_skips_timestamp() {
        let catalog = AppCatalog::from_value(json!({
            "10": "Counter-Strike",
            "updated_at": "2024-01-01T00:00:00Z"
        }));
        assert_eq!(catalog.ids(), vec![10]);
    }

    #[test]
    fn test_roundtrip() {
        let mut catalog = AppCatalog::new();
        catalog.merge(&[entry(570, "Dota 2")]);

        let reloaded = AppCatalog::from_value(catalog.to_value_with_timestamp());
        assert_eq!(reloaded.ids(), vec![570]);
    }
}
