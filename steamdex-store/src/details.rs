//! The detail map artifact.

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

use steamdex_core::{app_key, parse_app_key, AppId, DetailRecord};

/// Reserved top-level key carrying the last-write timestamp.
///
/// It sits alongside the app-ID keys in the persisted object and must
/// never be mistaken for an app ID when iterating.
pub const RESERVED_TIMESTAMP_KEY: &str = "updated_at";

/// In-memory view of the detail map: stringified app ID -> raw detail
/// record.
///
/// Grows monotonically; entries are never evicted once added. The
/// reserved timestamp key is stripped on load and re-added with a
/// fresh value on save, so iteration here only ever sees app IDs.
#[derive(Debug, Clone, Default)]
pub struct DetailMap {
    entries: BTreeMap<String, DetailRecord>,
}

impl DetailMap {
    /// Creates an empty detail map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from a persisted JSON value, stripping the
    /// reserved timestamp key. Anything that is not an object yields
    /// an empty map.
    pub fn from_value(value: Value) -> Self {
        let mut entries = BTreeMap::new();
        if let Value::Object(obj) = value {
            for (key, record) in obj {
                if key != RESERVED_TIMESTAMP_KEY {
                    entries.insert(key, record);
                }
            }
        }
        Self { entries }
    }

    /// Serializes the full map plus a fresh timestamp for persisting.
    pub fn to_value_with_timestamp(&self) -> Value {
        let mut obj = serde_json::Map::new();
        for (key, record) in &self.entries {
            obj.insert(key.clone(), record.clone());
        }
        obj.insert(
            RESERVED_TIMESTAMP_KEY.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        Value::Object(obj)
    }

    /// Returns true if this app is already resolved.
    pub fn contains(&self, app_id: AppId) -> bool {
        self.entries.contains_key(&app_key(app_id))
    }

    /// Inserts a resolved detail record under the stringified ID.
    pub fn insert(&mut self, app_id: AppId, record: DetailRecord) {
        self.entries.insert(app_key(app_id), record);
    }

    /// Number of resolved apps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the resolved app IDs.
    ///
    /// Keys that fail to parse are skipped; the reserved timestamp key
    /// was already stripped on load, so in practice this is every key.
    pub fn ids(&self) -> impl Iterator<Item = AppId> + '_ {
        self.entries.keys().filter_map(|k| parse_app_key(k).ok())
    }

    /// Looks up a resolved record by ID.
    pub fn get(&self, app_id: AppId) -> Option<&DetailRecord> {
        self.entries.get(&app_key(app_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_strips_timestamp_key() {
        let value = json!({
            "570": {"name": "Dota 2"},
            "updated_at": "2024-01-01T00:00:00Z"
        });

        let map = DetailMap::from_value(value);
        assert_eq!(map.len(), 1);
        assert!(map.contains(570));
        assert_eq!(map.ids().collect::<Vec<_>>(), vec![570]);
    }

    #[test]
    fn test_save_value_carries_fresh_timestamp() {
        let mut map = DetailMap::new();
        map.insert(440, json!({"name": "Team Fortress 2"}));

        let value = map.to_value_with_timestamp();
        assert!(value[RESERVED_TIMESTAMP_KEY].is_string());
        assert_eq!(value["440"]["name"], "Team Fortress 2");
    }

    #[test]
    fn test_non_object_value_is_empty_map() {
        assert!(DetailMap::from_value(json!(null)).is_empty());
        assert!(DetailMap::from_value(json!([1, 2])).is_empty());
    }

    #[test]
    fn test_roundtrip_preserves_entries() {
        let mut map = DetailMap::new();
        map.insert(10, json!({"name": "Counter-Strike"}));
        map.insert(20, json!({"name": "Team Fortress Classic"}));

        let reloaded = DetailMap::from_value(map.to_value_with_timestamp());
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(10));
        assert!(reloaded.contains(20));
    }
}
