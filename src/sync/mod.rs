//! Document synchronization for Marksync
//!
//! This module keeps the three views of a document in step:
//!
//! - `document.rs` - The markdown document, editing and preview modes
//! - `controller.rs` - Mode switching and change propagation
//! - `preview.rs` - Preview pane state and the HTML-source view
//! - `debounce.rs` - Trailing-edge debouncer for preview refreshes
//! - `scheduler.rs` - Cancellable timers over a clock

mod controller;
mod debounce;
mod document;
mod preview;
mod scheduler;

pub use controller::{SyncConfig, SyncController};
pub use document::{EditingMode, PreviewMode};
pub use preview::HtmlSourceView;
pub use scheduler::SystemClock;

#[cfg(test)]
pub(crate) use document::INITIAL_DOCUMENT;
