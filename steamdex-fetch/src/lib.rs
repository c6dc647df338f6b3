// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # steamdex Fetch
//!
//! Steam Web API access for steamdex.
//!
//! This crate owns everything that talks to the network:
//!
//! - [`HttpClient`] - thin reqwest wrapper with timeout and user agent
//! - [`SteamClient`] - the catalog list and per-app detail endpoints,
//!   classifying each detail response as found / absent / retryable
//! - [`DetailFetcher`] - trait seam so drivers and tests can substitute
//!   a scripted fetcher for the real client
//! - [`RetryStrategy`] - explicit, inspectable backoff policy
//! - [`DetailResolver`] - wraps single-attempt fetches with bounded
//!   exponential backoff
//!
//! Requests are issued strictly serially by the callers in
//! `steamdex-sync`; nothing in this crate spawns concurrent work.

pub mod client;
pub mod error;
pub mod fetcher;
pub mod resolver;
pub mod retry;
pub mod steam;

pub use client::HttpClient;
pub use error::FetchError;
pub use fetcher::DetailFetcher;
pub use resolver::DetailResolver;
pub use retry::RetryStrategy;
pub use steam::SteamClient;
