//! Document Export Module for Marksync
//!
//! # Supported Exports
//!
//! - **Markdown File**: The document as `document.md` (`text/markdown`)
//! - **Clipboard HTML**: Copy the formatted HTML source shown in the preview
//!
//! # Architecture
//!
//! - `markdown.rs` - Markdown file export
//! - `clipboard.rs` - Platform clipboard operations

mod clipboard;
mod markdown;

pub use clipboard::copy_html_source;
pub use markdown::{export_markdown, EXPORT_FILE_NAME};
