//! Sync controller
//!
//! Owns the markdown document and keeps the three views consistent:
//!
//! - In WYSIWYG mode the rich editor is authoritative. Each mutation is
//!   serialized back into the document.
//! - In Source mode the markdown string is authoritative. Edits from the
//!   source view are written straight into the document.
//! - The preview follows the document after a quiet period.
//!
//! Switching modes transfers content into the surface that is about to
//! become authoritative before the mode flag flips.

use super::document::{DocumentState, EditingMode, PreviewMode, INITIAL_DOCUMENT};
use super::preview::PreviewPane;
use super::scheduler::{Clock, Scheduler};
use crate::config::Settings;
use crate::editor::TextStats;
use crate::markdown::Tokenizer;
use crate::rich::{FormatCommand, Mark, RichDocument, RichEditor};
use log::{debug, info};
use std::time::Duration;

/// Default quiet period before the preview reloads.
pub const DEFAULT_PREVIEW_DEBOUNCE: Duration = Duration::from_millis(300);

/// Work items carried by the controller's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncTask {
    RefreshPreview,
}

// ─────────────────────────────────────────────────────────────────────────────
// SyncConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Startup parameters for a `SyncController`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub initial_markdown: String,
    pub editing_mode: EditingMode,
    pub preview_mode: PreviewMode,
    pub preview_debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            initial_markdown: INITIAL_DOCUMENT.to_string(),
            editing_mode: EditingMode::default(),
            preview_mode: PreviewMode::default(),
            preview_debounce: DEFAULT_PREVIEW_DEBOUNCE,
        }
    }
}

impl SyncConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            editing_mode: settings.default_editing_mode,
            preview_mode: settings.default_preview_mode,
            preview_debounce: settings.preview_debounce(),
            ..Self::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SyncController
// ─────────────────────────────────────────────────────────────────────────────

pub struct SyncController<R, C: Clock> {
    document: DocumentState,
    stats: TextStats,
    editor: Option<R>,
    preview: PreviewPane<R>,
    scheduler: Scheduler<SyncTask, C>,
    tokenizer: Box<dyn Tokenizer>,
}

impl<R: RichEditor, C: Clock> SyncController<R, C> {
    pub fn new(config: SyncConfig, clock: C, tokenizer: Box<dyn Tokenizer>) -> Self {
        let stats = TextStats::from_markdown(&config.initial_markdown);
        Self {
            document: DocumentState::new(config.initial_markdown, config.editing_mode),
            stats,
            editor: None,
            preview: PreviewPane::new(config.preview_debounce, config.preview_mode),
            scheduler: Scheduler::new(clock),
            tokenizer,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    pub fn markdown(&self) -> &str {
        self.document.markdown()
    }

    pub fn mode(&self) -> EditingMode {
        self.document.mode()
    }

    pub fn stats(&self) -> TextStats {
        self.stats
    }

    pub fn editor(&self) -> Option<&R> {
        self.editor.as_ref()
    }

    /// Mutable access for the WYSIWYG view. Call `handle_editor_update`
    /// after any mutation.
    pub fn editor_mut(&mut self) -> Option<&mut R> {
        self.editor.as_mut()
    }

    pub fn preview(&self) -> &PreviewPane<R> {
        &self.preview
    }

    pub fn preview_editor_mut(&mut self) -> Option<&mut R> {
        self.preview.editor_mut()
    }

    /// Formatting actions are only available while the rich editor is
    /// mounted and authoritative.
    pub fn toolbar_enabled(&self) -> bool {
        self.editor.is_some() && self.document.mode() == EditingMode::Wysiwyg
    }

    /// Whether `mark` is active at the rich editor's cursor.
    pub fn is_active(&self, mark: Mark) -> bool {
        self.toolbar_enabled()
            && self
                .editor
                .as_ref()
                .is_some_and(|editor| editor.is_active(mark))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rich editor
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach the rich editor and load the current document into it.
    pub fn mount_editor(&mut self, mut editor: R) {
        editor.set_markdown(self.document.markdown());
        self.editor = Some(editor);
        debug!("Rich editor mounted");
    }

    pub fn unmount_editor(&mut self) -> Option<R> {
        self.editor.take()
    }

    /// Switch the authoritative surface. A no-op until the rich editor is
    /// mounted.
    pub fn change_mode(&mut self, new_mode: EditingMode) {
        let Some(editor) = self.editor.as_mut() else {
            debug!("Ignoring mode change to {:?}: editor not mounted", new_mode);
            return;
        };

        match (self.document.mode(), new_mode) {
            (EditingMode::Wysiwyg, EditingMode::Source) => {
                let markdown = editor.get_markdown();
                self.set_markdown(markdown);
            }
            (EditingMode::Source, EditingMode::Wysiwyg) => {
                editor.set_markdown(self.document.markdown());
            }
            _ => {}
        }

        self.document.set_mode(new_mode);
        info!("Editing mode: {}", new_mode.label());
    }

    /// Pull the rich editor's content into the document. Called after every
    /// mutation of the rich editor.
    ///
    /// In source mode the editor is hidden and its content is stale, so the
    /// update is dropped instead of overwriting the source text.
    pub fn handle_editor_update(&mut self) {
        if self.document.mode() != EditingMode::Wysiwyg {
            debug!("Ignoring rich editor update in source mode");
            return;
        }
        let Some(editor) = self.editor.as_ref() else {
            return;
        };
        let markdown = editor.get_markdown();
        self.set_markdown(markdown);
    }

    /// Write text from the source view into the document.
    pub fn handle_source_change(&mut self, text: &str) {
        if self.document.mode() != EditingMode::Source {
            debug!("Ignoring source change in WYSIWYG mode");
            return;
        }
        self.set_markdown(text.to_string());
    }

    /// The single write path into the document.
    fn set_markdown(&mut self, markdown: String) -> bool {
        if !self.document.set_markdown(markdown) {
            return false;
        }
        self.stats = TextStats::from_markdown(self.document.markdown());

        if self.preview.is_mounted() {
            self.preview
                .debouncer_mut()
                .trigger(&mut self.scheduler, SyncTask::RefreshPreview);
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preview
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach the preview's read-only instance. It is loaded right away and
    /// a debounced refresh is scheduled.
    pub fn mount_preview(&mut self, editor: R) {
        self.preview.mount(editor);
        self.preview
            .refresh(self.document.markdown(), self.tokenizer.as_ref());
        self.preview
            .debouncer_mut()
            .trigger(&mut self.scheduler, SyncTask::RefreshPreview);
        debug!("Preview mounted");
    }

    /// Detach the preview and cancel its pending refresh.
    pub fn unmount_preview(&mut self) -> Option<R> {
        self.preview.debouncer_mut().cancel(&mut self.scheduler);
        self.preview.unmount()
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) {
        if self.preview.mode() == mode {
            return;
        }
        self.preview.set_mode(mode, self.tokenizer.as_ref());
        info!("Preview mode: {}", mode.label());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timers
    // ─────────────────────────────────────────────────────────────────────────

    /// Run every timer that has fallen due. Returns the number of tasks run.
    pub fn tick(&mut self) -> usize {
        let mut handled = 0;
        for (token, task) in self.scheduler.due() {
            match task {
                SyncTask::RefreshPreview => {
                    if !self.preview.debouncer_mut().fired(token) {
                        continue;
                    }
                    self.preview
                        .refresh(self.document.markdown(), self.tokenizer.as_ref());
                    handled += 1;
                }
            }
        }
        handled
    }

    /// Time until the next timer falls due, if any is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn preview_refresh_pending(&self) -> bool {
        self.preview.refresh_pending()
    }
}

impl<C: Clock> SyncController<RichDocument, C> {
    /// Apply a toolbar command to the rich editor.
    pub fn apply_format(&mut self, command: &FormatCommand) -> bool {
        if !self.toolbar_enabled() {
            debug!("Ignoring {} outside WYSIWYG mode", command.label());
            return false;
        }
        let applied = self
            .editor
            .as_mut()
            .is_some_and(|editor| editor.apply(command));
        if applied {
            self.handle_editor_update();
        }
        applied
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
