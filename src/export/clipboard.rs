//! Clipboard operations
//!
//! Copies the formatted HTML of the preview to the system clipboard using
//! the arboard crate.

use crate::error::{Error, Result};
use arboard::Clipboard;
use log::debug;

/// Copy plain text to the clipboard.
pub fn copy_text_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}

/// Copy formatted HTML source to the clipboard as text.
///
/// The HTML is copied as source code, not as rich content, so pasting it
/// into another editor shows the markup.
pub fn copy_html_source(formatted_html: &str) -> Result<()> {
    if formatted_html.is_empty() {
        return Err(Error::NothingToCopy);
    }
    copy_text_to_clipboard(formatted_html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_empty_html_is_rejected() {
        let err = copy_html_source("").unwrap_err();
        assert!(matches!(err, Error::NothingToCopy));
    }

    // Actual clipboard writes need a display server, which CI lacks.
}
