//! Markdown file export
//!
//! Writes the current document to disk as a `.md` file. This is a one-shot
//! export; the editor does not track the file afterwards.

use crate::error::{Error, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// File name used when exporting into a directory.
pub const EXPORT_FILE_NAME: &str = "document.md";

/// MIME type of exported documents.
pub const EXPORT_MIME_TYPE: &str = "text/markdown";

/// Write `markdown` as `document.md` inside `dir`.
///
/// Returns the path of the written file.
pub fn export_markdown(markdown: &str, dir: &Path) -> Result<PathBuf> {
    export_markdown_to(markdown, &dir.join(EXPORT_FILE_NAME))
}

/// Write `markdown` to `path`, replacing any existing file.
pub fn export_markdown_to(markdown: &str, path: &Path) -> Result<PathBuf> {
    fs::write(path, markdown).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Exported {} bytes of {} to {}",
        markdown.len(),
        EXPORT_MIME_TYPE,
        path.display()
    );
    Ok(path.to_path_buf())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_document_md() {
        let dir = TempDir::new().unwrap();
        let path = export_markdown("# Hello\n", dir.path()).unwrap();

        assert_eq!(path, dir.path().join("document.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Hello\n");
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "old").unwrap();

        export_markdown_to("new", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_export_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = export_markdown("", dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = export_markdown("text", &missing).unwrap_err();
        match err {
            Error::Export { path, .. } => assert_eq!(path, missing.join(EXPORT_FILE_NAME)),
            other => panic!("Expected Export, got {:?}", other),
        }
    }
}
