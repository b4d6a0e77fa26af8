//! Ribbon UI Component for Marksync
//!
//! Icon-based toolbar above the editor, organized into groups: formatting,
//! editing and preview modes, export, theme.

use super::dialogs::UrlKind;
use crate::markdown::HeadingLevel;
use crate::rich::{FormatCommand, Mark};
use crate::sync::{EditingMode, PreviewMode};
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the ribbon in expanded state.
const RIBBON_HEIGHT_EXPANDED: f32 = 40.0;

/// Height of the ribbon in collapsed state.
const RIBBON_HEIGHT_COLLAPSED: f32 = 28.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(32.0, 28.0);

/// Actions that can be triggered from the ribbon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RibbonAction {
    /// Apply a formatting command to the rich editor
    Format(FormatCommand),
    /// Ask for a URL, then insert a link or image
    PromptUrl(UrlKind),
    SetEditingMode(EditingMode),
    SetPreviewMode(PreviewMode),
    /// Export the document as a markdown file
    Export,
    CycleTheme,
    ToggleCollapse,
}

/// What a format button does when clicked.
#[derive(Debug, Clone)]
enum ButtonTarget {
    Command(FormatCommand),
    Prompt(UrlKind),
}

struct FormatButton {
    icon: &'static str,
    tooltip: &'static str,
    mark: Mark,
    target: ButtonTarget,
    bold: bool,
}

impl FormatButton {
    fn command(icon: &'static str, tooltip: &'static str, command: FormatCommand) -> Self {
        Self {
            icon,
            tooltip,
            mark: command.mark(),
            target: ButtonTarget::Command(command),
            bold: false,
        }
    }

    fn prompt(icon: &'static str, tooltip: &'static str, kind: UrlKind) -> Self {
        let mark = match kind {
            UrlKind::Link => Mark::Link,
            UrlKind::Image => Mark::Image,
        };
        Self {
            icon,
            tooltip,
            mark,
            target: ButtonTarget::Prompt(kind),
            bold: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn action(&self) -> RibbonAction {
        match &self.target {
            ButtonTarget::Command(command) => RibbonAction::Format(command.clone()),
            ButtonTarget::Prompt(kind) => RibbonAction::PromptUrl(*kind),
        }
    }
}

/// Format buttons, in display order. `None` marks a group gap.
fn format_buttons() -> Vec<Option<FormatButton>> {
    vec![
        Some(FormatButton::command("B", "Bold", FormatCommand::Bold).bold()),
        Some(FormatButton::command("I", "Italic", FormatCommand::Italic)),
        Some(FormatButton::command("S", "Strikethrough", FormatCommand::Strikethrough)),
        Some(FormatButton::command("<>", "Inline code", FormatCommand::InlineCode)),
        None,
        Some(FormatButton::command("H1", "Heading 1", FormatCommand::Heading(HeadingLevel::H1))),
        Some(FormatButton::command("H2", "Heading 2", FormatCommand::Heading(HeadingLevel::H2))),
        Some(FormatButton::command("H3", "Heading 3", FormatCommand::Heading(HeadingLevel::H3))),
        None,
        Some(FormatButton::command("•", "Bullet list", FormatCommand::BulletList)),
        Some(FormatButton::command("1.", "Numbered list", FormatCommand::OrderedList)),
        Some(FormatButton::command("☑", "Task list", FormatCommand::TaskList)),
        Some(FormatButton::command(">", "Blockquote", FormatCommand::Blockquote)),
        Some(FormatButton::command("{}", "Code block", FormatCommand::CodeBlock)),
        None,
        Some(FormatButton::command("—", "Horizontal rule", FormatCommand::HorizontalRule)),
        Some(FormatButton::prompt("🔗", "Link", UrlKind::Link)),
        Some(FormatButton::prompt("🖼", "Image", UrlKind::Image)),
        Some(FormatButton::command("▦", "Table", FormatCommand::Table)),
    ]
}

/// Current editor state the ribbon reflects.
pub struct RibbonState<'a> {
    pub editing_mode: EditingMode,
    pub preview_mode: PreviewMode,
    /// Formatting is only possible in WYSIWYG mode with the editor mounted
    pub format_enabled: bool,
    pub is_active: &'a dyn Fn(Mark) -> bool,
    pub theme_icon: &'static str,
}

/// Ribbon UI state and rendering.
#[derive(Debug, Clone, Default)]
pub struct Ribbon {
    collapsed: bool,
}

impl Ribbon {
    pub fn new() -> Self {
        Self { collapsed: false }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn height(&self) -> f32 {
        if self.collapsed {
            RIBBON_HEIGHT_COLLAPSED
        } else {
            RIBBON_HEIGHT_EXPANDED
        }
    }

    /// Render the ribbon and return any triggered action.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        theme_colors: &ThemeColors,
        state: &RibbonState<'_>,
    ) -> Option<RibbonAction> {
        let mut action: Option<RibbonAction> = None;
        let is_dark = theme_colors.is_dark();

        let ribbon_bg = if is_dark {
            Color32::from_rgb(40, 40, 40)
        } else {
            Color32::from_rgb(248, 248, 248)
        };

        let separator_color = if is_dark {
            Color32::from_rgb(70, 70, 70)
        } else {
            Color32::from_rgb(210, 210, 210)
        };

        ui.painter()
            .rect_filled(ui.available_rect_before_wrap(), 0.0, ribbon_bg);

        ui.horizontal(|ui| {
            ui.set_height(self.height());
            ui.spacing_mut().item_spacing.x = 2.0;

            let collapse_icon = if self.is_collapsed() { "▶" } else { "◀" };
            let collapse_tooltip = if self.is_collapsed() {
                "Expand ribbon"
            } else {
                "Collapse ribbon"
            };
            if icon_button(ui, collapse_icon, collapse_tooltip, true, is_dark).clicked() {
                action = Some(RibbonAction::ToggleCollapse);
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════════
            // Format Group
            // ═══════════════════════════════════════════════════════════════════
            if !self.is_collapsed() {
                ui.label(
                    RichText::new("Format")
                        .size(10.0)
                        .color(theme_colors.text.muted),
                );
            }

            for button in format_buttons() {
                let Some(button) = button else {
                    ui.add_space(4.0);
                    continue;
                };
                let active = state.format_enabled && (state.is_active)(button.mark);
                if format_button(
                    ui,
                    button.icon,
                    button.tooltip,
                    state.format_enabled,
                    active,
                    is_dark,
                    button.bold,
                )
                .clicked()
                {
                    action = Some(button.action());
                }
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════════
            // View Group
            // ═══════════════════════════════════════════════════════════════════
            if !self.is_collapsed() {
                ui.label(
                    RichText::new("View")
                        .size(10.0)
                        .color(theme_colors.text.muted),
                );
            }

            for mode in [EditingMode::Wysiwyg, EditingMode::Source] {
                let selected = state.editing_mode == mode;
                if ui.selectable_label(selected, mode.label()).clicked() && !selected {
                    action = Some(RibbonAction::SetEditingMode(mode));
                }
            }

            ui.add_space(4.0);

            for mode in [PreviewMode::Rendered, PreviewMode::HtmlSource] {
                let selected = state.preview_mode == mode;
                if ui.selectable_label(selected, mode.label()).clicked() && !selected {
                    action = Some(RibbonAction::SetPreviewMode(mode));
                }
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════════
            // Export Group
            // ═══════════════════════════════════════════════════════════════════
            if !self.is_collapsed() {
                ui.label(
                    RichText::new("Export")
                        .size(10.0)
                        .color(theme_colors.text.muted),
                );
            }

            if icon_button(ui, "📥", "Export as Markdown (Ctrl+S)", true, is_dark).clicked() {
                action = Some(RibbonAction::Export);
            }

            // ═══════════════════════════════════════════════════════════════════
            // Settings Group (right-aligned)
            // ═══════════════════════════════════════════════════════════════════
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                if icon_button(ui, state.theme_icon, "Change Theme", true, is_dark).clicked() {
                    action = Some(RibbonAction::CycleTheme);
                }
            });
        });

        let rect = ui.min_rect();
        ui.painter().line_segment(
            [
                egui::pos2(rect.min.x, rect.max.y),
                egui::pos2(rect.max.x, rect.max.y),
            ],
            egui::Stroke::new(1.0, separator_color),
        );

        action
    }
}

/// Render an icon button with consistent styling.
fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, enabled: bool, is_dark: bool) -> Response {
    let text_color = if enabled {
        if is_dark {
            Color32::from_rgb(220, 220, 220)
        } else {
            Color32::from_rgb(50, 50, 50)
        }
    } else if is_dark {
        Color32::from_rgb(100, 100, 100)
    } else {
        Color32::from_rgb(160, 160, 160)
    };

    let hover_bg = if is_dark {
        Color32::from_rgb(60, 60, 60)
    } else {
        Color32::from_rgb(220, 220, 220)
    };

    let btn = ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if btn.hovered() && enabled {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), hover_bg);
    }

    ui.painter().text(
        btn.rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(16.0),
        text_color,
    );

    btn.on_hover_text(tooltip)
}

/// Render a format button with active state highlighting.
fn format_button(
    ui: &mut Ui,
    icon: &str,
    tooltip: &str,
    enabled: bool,
    active: bool,
    is_dark: bool,
    bold_text: bool,
) -> Response {
    let text_color = if enabled {
        if is_dark {
            Color32::from_rgb(220, 220, 220)
        } else {
            Color32::from_rgb(50, 50, 50)
        }
    } else if is_dark {
        Color32::from_rgb(100, 100, 100)
    } else {
        Color32::from_rgb(160, 160, 160)
    };

    let active_bg = if is_dark {
        Color32::from_rgb(70, 90, 120)
    } else {
        Color32::from_rgb(200, 220, 240)
    };

    let hover_bg = if is_dark {
        Color32::from_rgb(60, 60, 60)
    } else {
        Color32::from_rgb(220, 220, 220)
    };

    let mut text = RichText::new(icon).size(12.0).color(text_color);
    if bold_text {
        text = text.strong();
    }

    let btn = ui.add_enabled(
        enabled,
        egui::Button::new(text)
            .frame(false)
            .min_size(Vec2::new(24.0, 22.0)),
    );

    let background = if active && enabled {
        Some(active_bg)
    } else if btn.hovered() && enabled {
        Some(hover_bg)
    } else {
        None
    };

    // The fill covers the button text, so draw it again on top
    if let Some(fill) = background {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), fill);
        ui.painter().text(
            btn.rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(12.0),
            text_color,
        );
    }

    btn.on_hover_text(tooltip)
}

fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ribbon_toggle_collapsed() {
        let mut ribbon = Ribbon::new();
        assert!(!ribbon.is_collapsed());
        assert_eq!(ribbon.height(), RIBBON_HEIGHT_EXPANDED);

        ribbon.toggle_collapsed();
        assert!(ribbon.is_collapsed());
        assert_eq!(ribbon.height(), RIBBON_HEIGHT_COLLAPSED);
    }

    #[test]
    fn test_format_buttons_cover_every_command() {
        let buttons: Vec<_> = format_buttons().into_iter().flatten().collect();
        assert_eq!(buttons.len(), 16);

        let marks: Vec<Mark> = buttons.iter().map(|b| b.mark).collect();
        assert!(marks.contains(&Mark::Heading(HeadingLevel::H3)));
        assert!(marks.contains(&Mark::Link));
        assert!(marks.contains(&Mark::Table));
    }

    #[test]
    fn test_link_button_prompts() {
        let link = format_buttons()
            .into_iter()
            .flatten()
            .find(|b| b.mark == Mark::Link)
            .map(|b| b.action());
        assert_eq!(link, Some(RibbonAction::PromptUrl(UrlKind::Link)));
    }

    #[test]
    fn test_button_action_carries_command() {
        let bold = FormatButton::command("B", "Bold", FormatCommand::Bold);
        assert_eq!(bold.action(), RibbonAction::Format(FormatCommand::Bold));
    }
}
