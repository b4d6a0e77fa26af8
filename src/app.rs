//! Main application module for Marksync
//!
//! This module implements the eframe App trait. It owns the sync controller
//! and routes UI events into it: ribbon actions, keyboard shortcuts, edits
//! from the WYSIWYG and source views, and the preview's copy button.

use crate::config::Settings;
use crate::export::{copy_html_source, export_markdown};
use crate::files::export_dir_dialog;
use crate::markdown::get_tokenizer;
use crate::rich::{FormatCommand, Mark, RichDocument};
use crate::sync::{EditingMode, PreviewMode, SyncConfig, SyncController, SystemClock};
use crate::theme::ThemeManager;
use crate::ui::{
    show_html_source, show_loading, show_rendered, HtmlCopy, RichView, Ribbon, RibbonAction, RibbonState,
    SourceView, UrlPrompt, UrlPromptResult, LOADING_EDITOR,
};
use eframe::egui;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// after the closure returns.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyboardAction {
    Format(FormatCommand),
    ToggleEditingMode,
    CycleTheme,
    Export,
}

/// A temporary message in the status bar.
#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: f64,
}

/// The main application struct.
pub struct MarksyncApp {
    settings: Settings,
    sync: SyncController<RichDocument, SystemClock>,
    theme_manager: ThemeManager,
    ribbon: Ribbon,
    /// Open link/image URL prompt
    url_prompt: Option<UrlPrompt>,
    toast: Option<Toast>,
    /// Text shown by the source view, re-read when the document revision moves
    source_buffer: String,
    source_revision: Option<u64>,
    /// Directory of the last export, offered first in the folder picker
    last_export_dir: Option<PathBuf>,
    /// Whether the editor and preview instances have been mounted
    mounted: bool,
    /// Application start time for timing toast messages
    start_time: Instant,
}

impl MarksyncApp {
    /// Create a new MarksyncApp instance from the loaded settings.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        info!("Initializing Marksync");

        let mut theme_manager = ThemeManager::new(settings.theme);
        theme_manager.apply_if_needed(&cc.egui_ctx);
        info!("Applied initial theme: {:?}", settings.theme);

        let sync = SyncController::new(
            SyncConfig::from_settings(&settings),
            SystemClock::default(),
            Box::new(get_tokenizer()),
        );

        Self {
            settings,
            sync,
            theme_manager,
            ribbon: Ribbon::new(),
            url_prompt: None,
            toast: None,
            source_buffer: String::new(),
            source_revision: None,
            last_export_dir: None,
            mounted: false,
            start_time: Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn show_toast(&mut self, message: impl Into<String>, duration: f64) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: self.get_app_time() + duration,
        });
    }

    /// Mount both rich instances on the first frame.
    fn mount_surfaces(&mut self) {
        self.sync.mount_editor(RichDocument::new());
        self.sync.mount_preview(RichDocument::read_only());
        self.mounted = true;
        info!("Editor and preview mounted");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle keyboard shortcuts.
    ///
    /// - Ctrl+B: Bold
    /// - Ctrl+I: Italic
    /// - Ctrl+E: Toggle WYSIWYG / Markdown
    /// - Ctrl+S: Export as markdown
    /// - Ctrl+Shift+T: Cycle theme
    fn handle_keyboard_shortcuts(&self, ctx: &egui::Context) -> Option<KeyboardAction> {
        ctx.input(|i| {
            if i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::T) {
                debug!("Keyboard shortcut: Ctrl+Shift+T (Cycle Theme)");
                return Some(KeyboardAction::CycleTheme);
            }

            if !i.modifiers.ctrl || i.modifiers.shift {
                return None;
            }

            if i.key_pressed(egui::Key::B) {
                debug!("Keyboard shortcut: Ctrl+B (Bold)");
                Some(KeyboardAction::Format(FormatCommand::Bold))
            } else if i.key_pressed(egui::Key::I) {
                debug!("Keyboard shortcut: Ctrl+I (Italic)");
                Some(KeyboardAction::Format(FormatCommand::Italic))
            } else if i.key_pressed(egui::Key::E) {
                debug!("Keyboard shortcut: Ctrl+E (Toggle Editing Mode)");
                Some(KeyboardAction::ToggleEditingMode)
            } else if i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+S (Export)");
                Some(KeyboardAction::Export)
            } else {
                None
            }
        })
    }

    fn handle_ribbon_action(&mut self, action: RibbonAction) {
        match action {
            RibbonAction::Format(command) => self.apply_format(&command),
            RibbonAction::PromptUrl(kind) => {
                if self.sync.toolbar_enabled() {
                    self.url_prompt = Some(UrlPrompt::new(kind));
                }
            }
            RibbonAction::SetEditingMode(mode) => self.sync.change_mode(mode),
            RibbonAction::SetPreviewMode(mode) => self.sync.set_preview_mode(mode),
            RibbonAction::Export => self.handle_export(),
            RibbonAction::CycleTheme => self.handle_cycle_theme(),
            RibbonAction::ToggleCollapse => self.ribbon.toggle_collapsed(),
        }
    }

    fn apply_format(&mut self, command: &FormatCommand) {
        if !self.sync.apply_format(command) {
            debug!("Format command {:?} not applied", command);
        }
    }

    fn toggle_editing_mode(&mut self) {
        let next = match self.sync.mode() {
            EditingMode::Wysiwyg => EditingMode::Source,
            EditingMode::Source => EditingMode::Wysiwyg,
        };
        self.sync.change_mode(next);
    }

    fn handle_cycle_theme(&mut self) {
        let theme = self.theme_manager.cycle();
        self.show_toast(format!("Theme: {:?}", theme), 1.5);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle exporting the current document as a markdown file.
    fn handle_export(&mut self) {
        let Some(dir) = export_dir_dialog(self.last_export_dir.as_deref()) else {
            debug!("Export cancelled");
            return;
        };

        match export_markdown(self.sync.markdown(), &dir) {
            Ok(path) => {
                self.last_export_dir = Some(dir);
                self.show_toast(format!("Exported to {}", path.display()), 2.5);

                if self.settings.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!("Failed to open exported file: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!("Failed to export markdown: {}", e);
                self.show_toast(format!("Export failed: {}", e), 3.0);
            }
        }
    }

    /// Handle copying the formatted HTML source to the clipboard.
    fn handle_copy_html(&mut self, target: HtmlCopy) {
        let Some(view) = self.sync.preview().html_view() else {
            self.show_toast("Nothing to copy", 2.0);
            return;
        };

        match copy_html_source(target.text(view)) {
            Ok(()) => self.show_toast("HTML copied to clipboard", 2.0),
            Err(e) => {
                warn!("Failed to copy HTML to clipboard: {}", e);
                self.show_toast(format!("Copy failed: {}", e), 3.0);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panels
    // ─────────────────────────────────────────────────────────────────────────

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        let stats = self.sync.stats();
        let mode = self.sync.mode();
        let toast = self.toast.as_ref().map(|t| t.message.clone());

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(stats.format_compact());

                if let Some(toast) = toast {
                    ui.with_layout(
                        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                        |ui| {
                            ui.label(egui::RichText::new(toast).italics());
                        },
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(mode.label());
                    if self.sync.preview_refresh_pending() {
                        ui.separator();
                        ui.spinner();
                    }
                });
            });
        });
    }

    fn show_editor_column(&mut self, ui: &mut egui::Ui, colors: &crate::theme::ThemeColors) {
        let font_size = self.settings.font_size;

        match self.sync.mode() {
            EditingMode::Wysiwyg => match self.sync.editor_mut() {
                Some(document) => {
                    let output = RichView::new(document, colors)
                        .font_size(font_size)
                        .id_source("editor")
                        .show(ui);
                    if output.changed {
                        self.sync.handle_editor_update();
                    }
                }
                None => show_loading(ui, LOADING_EDITOR, colors),
            },
            EditingMode::Source => {
                let revision = self.sync.document().revision();
                if self.source_revision != Some(revision) {
                    self.source_buffer = self.sync.markdown().to_string();
                    self.source_revision = Some(revision);
                }

                let output = SourceView::new(&mut self.source_buffer, colors)
                    .font_size(font_size)
                    .show(ui);
                if output.changed {
                    self.sync.handle_source_change(&self.source_buffer);
                    self.source_revision = Some(self.sync.document().revision());
                }
            }
        }
    }

    fn show_preview_column(&mut self, ui: &mut egui::Ui, colors: &crate::theme::ThemeColors) {
        let font_size = self.settings.font_size;

        match self.sync.preview().mode() {
            PreviewMode::Rendered => {
                show_rendered(ui, self.sync.preview_editor_mut(), colors, font_size);
            }
            PreviewMode::HtmlSource => {
                let copy = show_html_source(ui, self.sync.preview().html_view(), colors, font_size);
                if let Some(target) = copy {
                    self.handle_copy_html(target);
                }
            }
        }
    }
}

impl eframe::App for MarksyncApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.mounted {
            self.mount_surfaces();
        }

        self.theme_manager.apply_if_needed(ctx);

        let refreshed = self.sync.tick();
        if refreshed > 0 {
            debug!("Preview refreshed ({} timer(s) fired)", refreshed);
        }

        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.expires_at <= self.get_app_time())
        {
            self.toast = None;
        }

        let colors = self.theme_manager.colors(ctx);
        let is_dark = self.theme_manager.is_dark(ctx);

        // Format actions are deferred until the editor has rendered, so the
        // selection they act on is this frame's
        let mut deferred_format: Option<FormatCommand> = None;

        match self.handle_keyboard_shortcuts(ctx) {
            Some(KeyboardAction::Format(command)) => deferred_format = Some(command),
            Some(KeyboardAction::ToggleEditingMode) => self.toggle_editing_mode(),
            Some(KeyboardAction::CycleTheme) => self.handle_cycle_theme(),
            Some(KeyboardAction::Export) => self.handle_export(),
            None => {}
        }

        let ribbon_action = {
            let sync = &self.sync;
            let ribbon = &mut self.ribbon;
            let is_active = |mark: Mark| sync.is_active(mark);
            let state = RibbonState {
                editing_mode: sync.mode(),
                preview_mode: sync.preview().mode(),
                format_enabled: sync.toolbar_enabled(),
                is_active: &is_active,
                theme_icon: self.theme_manager.icon(),
            };

            egui::TopBottomPanel::top("ribbon")
                .frame(
                    egui::Frame::none()
                        .stroke(egui::Stroke::NONE)
                        .inner_margin(egui::Margin::symmetric(4.0, 4.0)),
                )
                .show_separator_line(false)
                .show(ctx, |ui| ribbon.show(ui, &colors, &state))
                .inner
        };

        match ribbon_action {
            Some(RibbonAction::Format(command)) => deferred_format = Some(command),
            Some(other) => self.handle_ribbon_action(other),
            None => {}
        }

        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                self.show_editor_column(&mut columns[0], &colors);
                self.show_preview_column(&mut columns[1], &colors);
            });
        });

        if let Some(command) = deferred_format {
            self.apply_format(&command);
        }

        if let Some(prompt) = self.url_prompt.as_mut() {
            match prompt.show(ctx, is_dark) {
                UrlPromptResult::None => {}
                UrlPromptResult::Cancelled => self.url_prompt = None,
                UrlPromptResult::Confirmed(command) => {
                    self.url_prompt = None;
                    self.apply_format(&command);
                }
            }
        }

        // Wake up for the next debounced preview refresh
        if let Some(delay) = self.sync.next_deadline() {
            ctx.request_repaint_after(delay);
        }
        if self.toast.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.sync.unmount_preview();
        self.sync.unmount_editor();
        info!("Application exiting");
    }
}
