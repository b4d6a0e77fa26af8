//! Editor support for Marksync
//!
//! Helpers shared by the editing surfaces that do not belong to the sync
//! core. Currently the status bar statistics.

mod stats;

pub use stats::TextStats;
