// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # steamdex Store
//!
//! The durable reconciliation state for steamdex.
//!
//! Four JSON artifacts live in one data directory:
//!
//! - `steam_apps_details.json` - the detail map (stringified app ID ->
//!   raw detail record, plus a reserved `updated_at` timestamp key)
//! - `failed_app_ids.json` - IDs whose last attempt ended in an
//!   unrecovered transport/server failure
//! - `non_existent_apps.json` - IDs the API confirmed absent
//! - `steam_apps_dict.json` - the catalog enumeration (ID -> name)
//!
//! All of them are safe to delete: a missing or malformed file loads
//! as empty state, never as an error. Saves are whole-file atomic
//! (temp file + rename), so an interrupt can lose un-checkpointed
//! progress but never corrupt what was already persisted.

pub mod catalog;
pub mod details;
pub mod error;
pub mod id_sets;
pub mod persistence;
pub mod store;

pub use catalog::AppCatalog;
pub use details::{DetailMap, RESERVED_TIMESTAMP_KEY};
pub use error::StoreError;
pub use id_sets::IdSetKind;
pub use persistence::{default_data_dir, load_json, save_json};
pub use store::ReconcileStore;
