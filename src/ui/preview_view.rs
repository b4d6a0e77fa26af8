//! Preview pane views
//!
//! The rendered preview reuses `RichView` over the read-only instance. The
//! HTML-source preview paints the tokenized, pretty-printed HTML.

use crate::rich::RichDocument;
use crate::sync::HtmlSourceView;
use crate::theme::ThemeColors;
use eframe::egui::{self, FontId, RichText, ScrollArea, Ui};

use super::highlight::tagged_layout_job;
use super::rich_view::RichView;

/// Shown until the editor instance is mounted.
pub const LOADING_EDITOR: &str = "Loading editor...";

/// Shown until the preview instance is mounted.
pub const LOADING_PREVIEW: &str = "Loading preview...";

/// Muted centered placeholder for a pane without content.
pub fn show_loading(ui: &mut Ui, message: &str, colors: &ThemeColors) {
    ui.centered_and_justified(|ui| {
        ui.label(RichText::new(message).color(colors.text.muted));
    });
}

/// Render the preview's rich instance.
pub fn show_rendered(
    ui: &mut Ui,
    document: Option<&mut RichDocument>,
    colors: &ThemeColors,
    font_size: f32,
) {
    match document {
        Some(document) => {
            RichView::new(document, colors)
                .font_size(font_size)
                .id_source("preview")
                .show(ui);
        }
        None => show_loading(ui, LOADING_PREVIEW, colors),
    }
}

/// Which text of the HTML-source view to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlCopy {
    /// The pretty-printed HTML
    Formatted,
    /// The class-tagged `<span>` markup, for pasting into a styled page
    Highlighted,
}

impl HtmlCopy {
    pub fn text(self, view: &HtmlSourceView) -> &str {
        match self {
            HtmlCopy::Formatted => &view.formatted,
            HtmlCopy::Highlighted => &view.highlighted,
        }
    }
}

/// Render the highlighted HTML source. Returns the copy the user asked for,
/// if any.
pub fn show_html_source(
    ui: &mut Ui,
    view: Option<&HtmlSourceView>,
    colors: &ThemeColors,
    font_size: f32,
) -> Option<HtmlCopy> {
    let Some(view) = view else {
        show_loading(ui, LOADING_PREVIEW, colors);
        return None;
    };

    let mut copy = None;
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("HTML")
                .size(10.0)
                .color(colors.text.muted),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .small_button("🎨 Copy highlighted")
                .on_hover_text("Copy the highlighted markup as class-tagged spans")
                .clicked()
            {
                copy = Some(HtmlCopy::Highlighted);
            }
            if ui
                .small_button("📋 Copy HTML")
                .on_hover_text("Copy the formatted HTML to the clipboard")
                .clicked()
            {
                copy = Some(HtmlCopy::Formatted);
            }
        });
    });
    ui.separator();

    ScrollArea::both()
        .id_source("html_source_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let job = tagged_layout_job(&view.tree, FontId::monospace(font_size * 0.9), &colors.syntax);
            ui.add(egui::Label::new(job).selectable(true));
        });

    copy
}
