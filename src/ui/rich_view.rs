//! WYSIWYG block view
//!
//! Shows a `RichDocument` as a column of editable blocks. Inline markdown is
//! kept as typed, but laid out with its styles applied and the delimiters
//! dimmed. The same view renders the read-only preview instance.
//!
//! # Keyboard
//! - **Enter in a paragraph or list item** splits the block at the cursor
//! - **Shift+Enter** inserts a line break inside the block
//!
//! In the read-only view a click on a link opens it in the system browser.
//!
//! # Example
//! ```ignore
//! let output = RichView::new(&mut document, &colors).font_size(14.0).show(ui);
//! if output.changed {
//!     controller.handle_editor_update();
//! }
//! ```

use crate::markdown::{link_at, style_spans, HeadingLevel};
use crate::rich::{Block, BlockKind, Container, Focus, ListMarker, RichDocument};
use crate::string_utils::{byte_index_to_char_index, char_index_to_byte_index, char_range_to_byte_range};
use crate::theme::ThemeColors;
use eframe::egui::{
    self,
    text::{CCursor, CCursorRange, LayoutJob},
    Color32, FontId, Key, ScrollArea, Stroke, TextBuffer, TextEdit, TextFormat, Ui, Vec2,
};
use log::{debug, warn};

use super::highlight::{highlighted, tagged_layout_job};

/// Placeholder shown in an empty document.
const PLACEHOLDER: &str = "Start writing...";

// ─────────────────────────────────────────────────────────────────────────────
// Output
// ─────────────────────────────────────────────────────────────────────────────

/// Result of showing the rich view.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichViewOutput {
    /// Whether the document was modified this frame
    pub changed: bool,
}

/// What happened to one block during a frame.
#[derive(Debug, Default)]
struct BlockEvent {
    text: Option<String>,
    task_toggled: bool,
    selection: Option<(usize, usize)>,
}

// ─────────────────────────────────────────────────────────────────────────────
// RichView
// ─────────────────────────────────────────────────────────────────────────────

pub struct RichView<'a> {
    document: &'a mut RichDocument,
    colors: &'a ThemeColors,
    font_size: f32,
    id_source: &'static str,
}

impl<'a> RichView<'a> {
    pub fn new(document: &'a mut RichDocument, colors: &'a ThemeColors) -> Self {
        Self {
            document,
            colors,
            font_size: 14.0,
            id_source: "rich_view",
        }
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Distinguish several views in the same window.
    #[must_use]
    pub fn id_source(mut self, id_source: &'static str) -> Self {
        self.id_source = id_source;
        self
    }

    pub fn show(self, ui: &mut Ui) -> RichViewOutput {
        let id = ui.id().with(self.id_source);
        let editable = self.document.is_editable();
        self.document.ensure_block();
        let focus_request = self.document.take_focus_request();

        let ctx = BlockContext {
            colors: self.colors,
            font_size: self.font_size,
            editable,
            single_block: self.document.blocks().len() == 1,
        };

        let events: Vec<(usize, BlockEvent)> = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let mut events = Vec::new();
                for (index, block) in self.document.blocks().iter().enumerate() {
                    if index > 0 && !block.tight_with_prev {
                        ui.add_space(self.font_size * 0.5);
                    }
                    let request = focus_request.filter(|f| f.block == index);
                    let event = show_block(ui, id.with(index), block, request, &ctx);
                    events.push((index, event));
                }
                events
            })
            .inner;

        let mut changed = false;
        for (index, event) in events {
            if event.task_toggled && self.document.toggle_task(index) {
                changed = true;
            }
            if let Some(text) = &event.text {
                if self.document.set_block_text(index, text) {
                    debug!("Block {} edited", index);
                    changed = true;
                }
            }
            if let Some(selection) = event.selection {
                // A split moves the focus itself
                let unsplit = match &event.text {
                    Some(text) => self.document.blocks().get(index).is_some_and(|b| &b.text == text),
                    None => true,
                };
                if unsplit {
                    self.document.set_focus(index, selection);
                }
            }
        }

        RichViewOutput { changed }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Blocks
// ─────────────────────────────────────────────────────────────────────────────

struct BlockContext<'a> {
    colors: &'a ThemeColors,
    font_size: f32,
    editable: bool,
    single_block: bool,
}

fn show_block(
    ui: &mut Ui,
    id: egui::Id,
    block: &Block,
    focus_request: Option<Focus>,
    ctx: &BlockContext<'_>,
) -> BlockEvent {
    let mut event = BlockEvent::default();

    ui.horizontal(|ui| {
        for container in &block.containers {
            match container {
                Container::Quote => {
                    let (rect, _) = ui.allocate_exact_size(
                        Vec2::new(3.0, ctx.font_size * 1.4),
                        egui::Sense::hover(),
                    );
                    ui.painter()
                        .rect_filled(rect, 0.0, ctx.colors.editor.blockquote_border);
                    ui.add_space(8.0);
                }
                Container::Indent(width) => ui.add_space(*width as f32 * ctx.font_size * 0.5),
            }
        }

        match &block.kind {
            BlockKind::ListItem { marker, task } => {
                match task {
                    Some(checked) => {
                        let mut checked = *checked;
                        let response =
                            ui.add_enabled(ctx.editable, egui::Checkbox::without_text(&mut checked));
                        event.task_toggled = response.changed();
                    }
                    None => {
                        let label = match marker {
                            ListMarker::Bullet(_) => "•".to_string(),
                            ListMarker::Ordered { .. } => marker.render(),
                        };
                        ui.label(
                            egui::RichText::new(label)
                                .size(ctx.font_size)
                                .color(ctx.colors.text.muted),
                        );
                    }
                }
                show_inline_text(ui, id, block, ctx.font_size, true, focus_request, ctx, &mut event);
            }
            BlockKind::Paragraph => {
                show_inline_text(ui, id, block, ctx.font_size, true, focus_request, ctx, &mut event);
            }
            BlockKind::Heading(level) => {
                let size = heading_size(*level, ctx.font_size);
                show_inline_text(ui, id, block, size, false, focus_request, ctx, &mut event);
            }
            BlockKind::Rule => {
                let width = ui.available_width();
                let (rect, _) =
                    ui.allocate_exact_size(Vec2::new(width, ctx.font_size), egui::Sense::hover());
                ui.painter().hline(
                    rect.x_range(),
                    rect.center().y,
                    Stroke::new(1.0, ctx.colors.editor.rule),
                );
            }
            BlockKind::CodeBlock { info } => {
                egui::Frame::none()
                    .fill(ctx.colors.editor.code_block_bg)
                    .inner_margin(8.0)
                    .rounding(4.0)
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            if !info.is_empty() {
                                ui.label(
                                    egui::RichText::new(info)
                                        .size(ctx.font_size * 0.8)
                                        .color(ctx.colors.text.muted),
                                );
                            }
                            show_code_text(ui, id, block, info, focus_request, ctx, &mut event);
                        });
                    });
            }
            BlockKind::Table | BlockKind::Html | BlockKind::FrontMatter | BlockKind::Raw => {
                show_code_text(ui, id, block, "", focus_request, ctx, &mut event);
            }
        }
    });

    event
}

fn heading_size(level: HeadingLevel, base: f32) -> f32 {
    match level {
        HeadingLevel::H1 => base * 1.8,
        HeadingLevel::H2 => base * 1.5,
        HeadingLevel::H3 => base * 1.3,
        HeadingLevel::H4 => base * 1.15,
        HeadingLevel::H5 => base * 1.05,
        HeadingLevel::H6 => base,
    }
}

#[allow(clippy::too_many_arguments)]
fn show_inline_text(
    ui: &mut Ui,
    id: egui::Id,
    block: &Block,
    font_size: f32,
    enter_splits: bool,
    focus_request: Option<Focus>,
    ctx: &BlockContext<'_>,
    event: &mut BlockEvent,
) {
    let colors = ctx.colors;
    let strong = if matches!(block.kind, BlockKind::Heading(_)) {
        ui.visuals().strong_text_color()
    } else {
        ui.visuals().text_color()
    };
    let mut layouter = |ui: &Ui, text: &str, wrap_width: f32| {
        let mut job = inline_layout_job(text, font_size, strong, ui.visuals().strong_text_color(), colors);
        job.wrap.max_width = wrap_width;
        ui.fonts(|f| f.layout_job(job))
    };

    let mut owned = block.text.clone();
    let mut shown = block.text.as_str();
    let buffer: &mut dyn TextBuffer = if ctx.editable { &mut owned } else { &mut shown };

    let mut edit = TextEdit::multiline(buffer)
        .id(id)
        .frame(false)
        .font(FontId::proportional(font_size))
        .desired_width(f32::INFINITY)
        .desired_rows(1)
        .layouter(&mut layouter);
    if ctx.editable && ctx.single_block {
        edit = edit.hint_text(PLACEHOLDER);
    }
    let output = edit.show(ui);

    apply_focus_request(ui, &output, &block.text, focus_request);

    if !ctx.editable && output.response.clicked() {
        if let Some(range) = output.cursor_range {
            let at = char_index_to_byte_index(&block.text, range.primary.ccursor.index);
            open_link_at(&block.text, at);
        }
    }

    let mut cursor = None;
    if output.response.has_focus() {
        if let Some(range) = output.cursor_range {
            let (a, b) = (range.primary.ccursor.index, range.secondary.ccursor.index);
            cursor = Some(range.primary.ccursor.index);
            event.selection = Some(char_range_to_byte_range(&owned, a, b));
        }
    }

    if ctx.editable && output.response.changed() {
        let enter = ui.input(|i| i.key_pressed(Key::Enter) && !i.modifiers.shift);
        if enter_splits && enter {
            split_at_typed_newline(&mut owned, cursor);
        }
        event.text = Some(owned);
    }
}

fn open_link_at(text: &str, at: usize) {
    let Some(url) = link_at(text, at) else {
        return;
    };
    debug!("Opening link {}", url);
    if let Err(e) = open::that(&url) {
        warn!("Failed to open link {}: {}", url, e);
    }
}

/// Turn the newline just typed before `cursor` into a blank line, which the
/// document treats as a block split.
fn split_at_typed_newline(text: &mut String, cursor: Option<usize>) {
    let Some(cursor) = cursor else {
        return;
    };
    let at = char_index_to_byte_index(text, cursor);
    if at > 0 && text[..at].ends_with('\n') {
        text.insert(at, '\n');
    }
}

fn show_code_text(
    ui: &mut Ui,
    id: egui::Id,
    block: &Block,
    language: &str,
    focus_request: Option<Focus>,
    ctx: &BlockContext<'_>,
    event: &mut BlockEvent,
) {
    let font_size = ctx.font_size * 0.9;
    let syntax = ctx.colors.syntax;
    let highlight_id = id.with("highlight");
    let mut layouter = |ui: &Ui, text: &str, wrap_width: f32| {
        let mut job = if language.is_empty() {
            LayoutJob::simple(
                text.to_owned(),
                FontId::monospace(font_size),
                ui.visuals().text_color(),
                wrap_width,
            )
        } else {
            let tree = highlighted(ui.ctx(), highlight_id, language, text);
            tagged_layout_job(&tree, FontId::monospace(font_size), &syntax)
        };
        job.wrap.max_width = wrap_width;
        ui.fonts(|f| f.layout_job(job))
    };

    let mut owned = block.text.clone();
    let mut shown = block.text.as_str();
    let buffer: &mut dyn TextBuffer = if ctx.editable { &mut owned } else { &mut shown };

    let output = TextEdit::multiline(buffer)
        .id(id)
        .code_editor()
        .frame(false)
        .desired_width(f32::INFINITY)
        .desired_rows(1)
        .layouter(&mut layouter)
        .show(ui);

    apply_focus_request(ui, &output, &block.text, focus_request);

    if ctx.editable && output.response.changed() {
        event.text = Some(owned);
    }
}

fn apply_focus_request(
    ui: &Ui,
    output: &egui::text_edit::TextEditOutput,
    text: &str,
    focus_request: Option<Focus>,
) {
    let Some(focus) = focus_request else {
        return;
    };
    let start = byte_index_to_char_index(text, focus.selection.0);
    let end = byte_index_to_char_index(text, focus.selection.1);

    let mut state = output.state.clone();
    state
        .cursor
        .set_char_range(Some(CCursorRange::two(CCursor::new(start), CCursor::new(end))));
    state.store(ui.ctx(), output.response.id);
    output.response.request_focus();
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Lay out inline markdown with its styles applied and delimiters dimmed.
fn inline_layout_job(
    text: &str,
    font_size: f32,
    text_color: Color32,
    strong_color: Color32,
    colors: &ThemeColors,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    for span in style_spans(text) {
        let style = span.style;
        let font_id = if style.code {
            FontId::monospace(font_size * 0.9)
        } else {
            FontId::proportional(font_size)
        };
        let color = if style.marker {
            colors.text.muted
        } else if style.link {
            colors.text.link
        } else if style.bold {
            strong_color
        } else {
            text_color
        };

        let mut format = TextFormat {
            font_id,
            color,
            italics: style.italic,
            ..Default::default()
        };
        if style.strikethrough {
            format.strikethrough = Stroke::new(1.0, color);
        }
        if style.code {
            format.background = colors.editor.code_block_bg;
        }
        if style.link {
            format.underline = Stroke::new(1.0, color);
        }
        job.append(&text[span.range], 0.0, format);
    }
    job
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_layout_covers_text() {
        let colors = ThemeColors::light();
        let text = "plain **bold** `code`";
        let job = inline_layout_job(text, 14.0, Color32::BLACK, Color32::RED, &colors);
        assert_eq!(job.text, text);
        assert!(job
            .sections
            .iter()
            .any(|s| s.format.color == Color32::RED));
        assert!(job
            .sections
            .iter()
            .any(|s| s.format.background == colors.editor.code_block_bg));
    }

    #[test]
    fn test_delimiters_are_muted() {
        let colors = ThemeColors::dark();
        let job = inline_layout_job("*a*", 14.0, Color32::WHITE, Color32::WHITE, &colors);
        assert_eq!(job.sections.first().map(|s| s.format.color), Some(colors.text.muted));
    }

    #[test]
    fn test_links_use_link_color() {
        let colors = ThemeColors::light();
        let job = inline_layout_job("go [here](https://x.dev)", 14.0, Color32::BLACK, Color32::BLACK, &colors);
        assert!(job
            .sections
            .iter()
            .any(|s| s.format.color == colors.text.link && s.format.underline.width > 0.0));
    }

    #[test]
    fn test_split_at_typed_newline() {
        let mut text = "Hello\nworld".to_string();
        split_at_typed_newline(&mut text, Some(6));
        assert_eq!(text, "Hello\n\nworld");
    }

    #[test]
    fn test_split_ignores_cursor_not_after_newline() {
        let mut text = "Hello".to_string();
        split_at_typed_newline(&mut text, Some(3));
        assert_eq!(text, "Hello");
        split_at_typed_newline(&mut text, None);
        assert_eq!(text, "Hello");
    }

    #[test]
    fn test_heading_sizes_decrease() {
        assert!(heading_size(HeadingLevel::H1, 14.0) > heading_size(HeadingLevel::H2, 14.0));
        assert_eq!(heading_size(HeadingLevel::H6, 14.0), 14.0);
    }
}
