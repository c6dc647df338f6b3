//! File persistence helpers.
//!
//! JSON load/save with atomic writes. A save writes the complete new
//! content to a temp file and renames it into place, so readers and
//! crashed writers never observe a half-written artifact.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Returns the default data directory for steamdex artifacts.
///
/// - Linux: `~/.local/share/steamdex`
/// - macOS: `~/Library/Application Support/steamdex`
/// - Windows: `%APPDATA%\steamdex`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("steamdex"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Saves data to a JSON file, creating parent directories as needed.
///
/// Writes atomically: full content to `<name>.json.tmp`, then rename.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), "JSON file saved");
    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;
    Ok(data)
}

/// Loads a JSON value, treating a missing or malformed file as empty
/// state.
///
/// The pipeline is designed so every artifact can be deleted and
/// rebuilt; "no file found" starts fresh silently, and unreadable
/// content starts fresh with a logged warning rather than a crash.
pub async fn load_json_or_empty(path: &Path) -> serde_json::Value {
    match load_json::<serde_json::Value>(path).await {
        Ok(value) => value,
        Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No existing file, starting fresh");
            serde_json::Value::Null
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable file, starting fresh");
            serde_json::Value::Null
        }
    }
}
