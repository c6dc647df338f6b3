//! Steam Web API client.
//!
//! Two endpoints matter to steamdex: the full catalog enumeration
//! (`GetAppList`) and the per-app detail lookup (`appdetails`). The
//! detail endpoint wraps its payload in an object keyed by the string
//! form of the requested ID, with a `success` flag that is the only
//! authoritative signal for "this app does not exist".

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use steamdex_core::{AppEntry, AppId, DetailOutcome};

use crate::client::HttpClient;
use crate::error::FetchError;
use crate::fetcher::DetailFetcher;

/// Catalog enumeration endpoint.
const APP_LIST_URL: &str = "https://api.steampowered.com/ISteamApps/GetAppList/v2/";

/// Per-app detail endpoint; takes `?appids={id}`.
const APP_DETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";

#[derive(Debug, Deserialize)]
struct AppListResponse {
    applist: AppList,
}

#[derive(Debug, Deserialize)]
struct AppList {
    #[serde(default)]
    apps: Vec<AppEntry>,
}

/// Client for the public Steam Web API.
#[derive(Debug, Clone)]
pub struct SteamClient {
    http: HttpClient,
}

impl SteamClient {
    /// Creates a client with the default request timeout.
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new()?,
        })
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::with_timeout(timeout)?,
        })
    }

    /// Fetches the full catalog as `{appid, name}` entries.
    ///
    /// The endpoint returns the entire catalog in one response; there
    /// is no pagination token.
    pub async fn app_list(&self) -> Result<Vec<AppEntry>, FetchError> {
        let response = self.http.get(APP_LIST_URL).await?;

        if !response.status().is_success() {
            return Err(FetchError::InvalidResponse(format!(
                "app list returned status {}",
                response.status()
            )));
        }

        let parsed: AppListResponse = response.json().await?;
        debug!(count = parsed.applist.apps.len(), "Fetched catalog app list");
        Ok(parsed.applist.apps)
    }

    /// Fetches the detail record for one app (single attempt).
    ///
    /// Outcome classification:
    /// - 429 is a retryable rate-limit error, carrying the server's
    ///   `Retry-After` hint when present
    /// - a well-formed body whose `success` flag is missing or false
    ///   is a confirmed absence, not an error
    /// - any other non-2xx status or unparseable body is a retryable
    ///   error
    pub async fn app_details(&self, app_id: AppId) -> Result<DetailOutcome, FetchError> {
        let url = format!("{APP_DETAILS_URL}?appids={app_id}");
        let response = self.http.get(&url).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());

            warn!(app_id, ?retry_after, "Rate limited by detail endpoint");
            return Err(FetchError::RateLimited { retry_after });
        }

        if !response.status().is_success() {
            return Err(FetchError::InvalidResponse(format!(
                "app {app_id} returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        Ok(classify_detail_body(app_id, &body))
    }
}

/// Classifies a well-formed detail response body.
///
/// The body looks like `{"570": {"success": true, "data": {...}}}`.
/// A missing entry, a missing or false `success` flag, or an empty
/// `data` object all mean the catalog has nothing usable for this ID.
fn classify_detail_body(app_id: AppId, body: &serde_json::Value) -> DetailOutcome {
    let entry = &body[app_id.to_string()];

    if entry["success"].as_bool() != Some(true) {
        return DetailOutcome::Absent;
    }

    match entry.get("data") {
        Some(data) if data.as_object().is_some_and(|o| !o.is_empty()) => {
            DetailOutcome::Found(data.clone())
        }
        _ => DetailOutcome::Absent,
    }
}

#[async_trait]
impl DetailFetcher for SteamClient {
    async fn fetch_detail(&self, app_id: AppId) -> Result<DetailOutcome, FetchError> {
        self.app_details(app_id).await
    }
}
