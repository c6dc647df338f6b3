// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # steamdex Sync
//!
//! The control loops that converge the local store onto the remote
//! catalog:
//!
//! - [`plan::pending_ids`] - computes the work set (catalog minus
//!   everything already resolved or confirmed absent)
//! - [`BatchRunner`] - walks a work set strictly serially with an
//!   enforced inter-request delay, checkpointing every N items
//! - [`SweepRunner`] - repeatedly re-runs the batch over the persisted
//!   failed set until it drains (or stalls)
//! - [`CancelFlag`] - cooperative interrupt; drivers finish the
//!   current item and persist before stopping
//!
//! Requests are issued one at a time on purpose: the remote rate
//! limiter is sensitive to concurrency, so a serial client with a
//! fixed delay is the correctness mechanism, not an optimization
//! opportunity.

pub mod batch;
pub mod cancel;
pub mod error;
pub mod plan;
pub mod sweep;

pub use batch::{BatchConfig, BatchReport, BatchRunner};
pub use cancel::CancelFlag;
pub use error::SyncError;
pub use sweep::{SweepConfig, SweepOutcome, SweepReport, SweepRunner};

#[cfg(test)]
mod test_support;
