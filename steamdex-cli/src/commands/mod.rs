//! Command implementations.

pub mod catalog;
pub mod status;
pub mod sweep;
pub mod sync;
