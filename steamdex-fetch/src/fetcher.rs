//! Detail fetcher trait.
//!
//! The seam between the drivers and the network. Production code plugs
//! in [`crate::SteamClient`]; tests plug in a scripted fetcher so the
//! batch and sweep state machines can be exercised without a network.

use async_trait::async_trait;
use steamdex_core::{AppId, DetailOutcome};

use crate::error::FetchError;

/// A source of per-app detail records.
///
/// `fetch_detail` performs exactly one attempt. A well-formed "no such
/// app" answer is `Ok(DetailOutcome::Absent)`, never an error; every
/// `Err` is a retryable condition that [`crate::DetailResolver`] may
/// spend an attempt on.
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    /// Fetches the detail record for one app ID (single attempt).
    async fn fetch_detail(&self, app_id: AppId) -> Result<DetailOutcome, FetchError>;
}

#[async_trait]
impl<T: DetailFetcher + ?Sized> DetailFetcher for &T {
    async fn fetch_detail(&self, app_id: AppId) -> Result<DetailOutcome, FetchError> {
        (**self).fetch_detail(app_id).await
    }
}

#[async_trait]
impl<T: DetailFetcher + ?Sized> DetailFetcher for std::sync::Arc<T> {
    async fn fetch_detail(&self, app_id: AppId) -> Result<DetailOutcome, FetchError> {
        (**self).fetch_detail(app_id).await
    }
}
