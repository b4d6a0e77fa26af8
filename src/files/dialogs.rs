//! Native file dialog integration using the rfd crate

use crate::export::EXPORT_FILE_NAME;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Opens a native folder picker for the markdown export.
///
/// The document is written as `document.md` inside the chosen folder.
/// Returns `None` if cancelled.
pub fn export_dir_dialog(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title(format!("Export {} to...", EXPORT_FILE_NAME));

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_folder()
}
