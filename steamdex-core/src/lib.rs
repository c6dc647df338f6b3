// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # steamdex Core
//!
//! Core types and models shared across the steamdex crates.
//!
//! This crate provides the foundational abstractions used by the fetch,
//! store, and sync crates:
//!
//! - [`AppId`] / [`AppEntry`] - catalog identity types
//! - [`DetailRecord`] - the opaque per-app document returned by the
//!   remote API
//! - [`DetailOutcome`] - single-attempt fetch classification
//!   (found vs. confirmed absent)
//! - [`Resolution`] - the outcome of a fully retried fetch
//!   (resolved / absent / hard failure)
//! - [`CoreError`] - shared error type

pub mod error;
pub mod models;

pub use error::CoreError;
pub use models::{
    app_key, parse_app_key, AppEntry, AppId, DetailOutcome, DetailRecord, Resolution,
};
