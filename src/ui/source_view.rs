//! Markdown source view
//!
//! Plain-text editor for the markdown string, highlighted as markdown.

use crate::theme::ThemeColors;
use eframe::egui::{FontId, ScrollArea, TextEdit, Ui};
use log::debug;

use super::highlight::{highlighted, tagged_layout_job};

/// Result of showing the source view.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceViewOutput {
    /// Whether the text was modified this frame
    pub changed: bool,
}

/// A text editor over the markdown source.
///
/// # Example
///
/// ```ignore
/// let mut text = controller.markdown().to_string();
/// if SourceView::new(&mut text, &colors).show(ui).changed {
///     controller.handle_source_change(&text);
/// }
/// ```
pub struct SourceView<'a> {
    text: &'a mut String,
    colors: &'a ThemeColors,
    font_size: f32,
}

impl<'a> SourceView<'a> {
    pub fn new(text: &'a mut String, colors: &'a ThemeColors) -> Self {
        Self {
            text,
            colors,
            font_size: 14.0,
        }
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn show(self, ui: &mut Ui) -> SourceViewOutput {
        let id = ui.id().with("source_view");
        let font_size = self.font_size;
        let syntax = self.colors.syntax;
        let highlight_id = id.with("highlight");

        let mut layouter = |ui: &Ui, text: &str, wrap_width: f32| {
            let tree = highlighted(ui.ctx(), highlight_id, "markdown", text);
            let mut job = tagged_layout_job(&tree, FontId::monospace(font_size), &syntax);
            job.wrap.max_width = wrap_width;
            ui.fonts(|f| f.layout_job(job))
        };

        let output = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                TextEdit::multiline(self.text)
                    .id(id)
                    .code_editor()
                    .frame(false)
                    .desired_width(f32::INFINITY)
                    .desired_rows(20)
                    .layouter(&mut layouter)
                    .show(ui)
            })
            .inner;

        let changed = output.response.changed();
        if changed {
            debug!("Source view edited");
        }
        SourceViewOutput { changed }
    }
}
