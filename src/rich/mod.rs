//! Rich-text editing
//!
//! The sync controller talks to the WYSIWYG surface only through the
//! `RichEditor` trait. `RichDocument` is the implementation used by the app
//! for both the editable surface and the read-only preview instance.

mod commands;
mod document;

pub use commands::{FormatCommand, Mark};
pub use document::{Block, BlockKind, Container, Focus, ListMarker, RichDocument};

/// A rich-text editor holding a markdown document.
pub trait RichEditor {
    /// Serialize the current content to markdown.
    fn get_markdown(&self) -> String;

    /// Replace the content with parsed markdown.
    fn set_markdown(&mut self, markdown: &str);

    /// Whether a mark (with its attributes) is active at the cursor.
    fn is_active(&self, mark: Mark) -> bool;

    /// Render the current content to HTML.
    fn get_html(&self) -> String;
}

/// Markdown whose rendering must survive a trip through the block model.
#[cfg(test)]
pub(crate) const ROUND_TRIP_SAMPLES: &[&str] = &[
    "Title\n=====\n\nBody",
    "Term\n===\n\n# H #",
    "See [docs][ref].\n\n[ref]: https://example.com",
    "[ref]: /first\n\n[Use it][ref]",
    "> See [a][r]\n>\n> [r]: /u",
    "- item with [link][x]\n\n  [x]: /x",
    "- [r]: /u\n- [See][r]",
    "> - a\n>   - b\n> - c",
    "| A | B |\n| --- | --- |\n| 1 | 2 |\n\nAfter",
    "<div>\n<b>hi</b>\n</div>\n\nText",
    "    let x = 1;\n\nText",
];
