//! File operations module for Marksync
//!
//! Native system dialogs used by the export action.

mod dialogs;

pub use dialogs::export_dir_dialog;
