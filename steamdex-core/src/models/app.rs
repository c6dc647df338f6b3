//! Catalog identity types.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A Steam application ID.
///
/// Positive integer key identifying one entry in the remote catalog.
/// Persisted artifacts key entries by the *string* form of this ID
/// (see [`app_key`]).
pub type AppId = u32;

/// One entry from the catalog list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    /// The application ID.
    pub appid: AppId,
    /// Display name reported by the catalog.
    #[serde(default)]
    pub name: String,
}

/// Returns the string key under which an app is stored in the
/// persisted JSON artifacts.
pub fn app_key(id: AppId) -> String {
    id.to_string()
}

/// Parses a persisted artifact key back into an [`AppId`].
///
/// Fails on non-numeric keys; callers are expected to have already
/// filtered out reserved metadata keys such as the write timestamp.
pub fn parse_app_key(key: &str) -> Result<AppId, CoreError> {
    key.parse::<AppId>()
        .map_err(|_| CoreError::InvalidData(format!("not an app id key: {key:?}")))
}
