//! Domain models for steamdex.

mod app;
mod detail;

pub use app::{app_key, parse_app_key, AppEntry, AppId};
pub use detail::{DetailOutcome, DetailRecord, Resolution};
