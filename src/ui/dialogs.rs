//! URL prompt for the link and image toolbar buttons.

use crate::rich::FormatCommand;
use eframe::egui::{self, Color32, Key};

/// What the prompted URL will be inserted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Link,
    Image,
}

impl UrlKind {
    fn title(&self) -> &'static str {
        match self {
            UrlKind::Link => "🔗 Insert Link",
            UrlKind::Image => "🖼 Insert Image",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            UrlKind::Link => "Enter URL:",
            UrlKind::Image => "Enter image URL:",
        }
    }

    /// The toolbar command for `url`, or `None` if the input is blank.
    pub fn command(&self, url: &str) -> Option<FormatCommand> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        Some(match self {
            UrlKind::Link => FormatCommand::Link(url.to_string()),
            UrlKind::Image => FormatCommand::Image(url.to_string()),
        })
    }
}

/// Result from showing the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPromptResult {
    /// Still open
    None,
    /// Closed without a URL
    Cancelled,
    Confirmed(FormatCommand),
}

/// State for an open URL prompt.
#[derive(Debug, Clone)]
pub struct UrlPrompt {
    kind: UrlKind,
    input: String,
}

impl UrlPrompt {
    pub fn new(kind: UrlKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, is_dark: bool) -> UrlPromptResult {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            return UrlPromptResult::Cancelled;
        }

        let bg_color = if is_dark {
            Color32::from_rgb(40, 40, 45)
        } else {
            Color32::from_rgb(250, 250, 250)
        };
        let border_color = if is_dark {
            Color32::from_rgb(70, 70, 80)
        } else {
            Color32::from_rgb(180, 180, 190)
        };

        let mut result = UrlPromptResult::None;
        let kind = self.kind;
        let input = &mut self.input;

        egui::Window::new(kind.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(bg_color)
                    .stroke(egui::Stroke::new(1.0, border_color))
                    .rounding(8.0),
            )
            .show(ctx, |ui| {
                ui.set_min_width(350.0);

                ui.add_space(8.0);
                ui.label(kind.label());
                ui.add_space(4.0);

                let response = ui.add(
                    egui::TextEdit::singleline(input)
                        .hint_text("https://")
                        .desired_width(330.0),
                );
                if input.is_empty() {
                    response.request_focus();
                }

                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let submitted =
                            response.lost_focus() && ctx.input(|i| i.key_pressed(Key::Enter));
                        if ui.button("Insert").clicked() || submitted {
                            // Blank input cancels
                            result = match kind.command(input) {
                                Some(command) => UrlPromptResult::Confirmed(command),
                                None => UrlPromptResult::Cancelled,
                            };
                        }

                        ui.add_space(8.0);

                        if ui.button("Cancel").clicked() {
                            result = UrlPromptResult::Cancelled;
                        }
                    });
                });

                ui.add_space(4.0);
            });

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_cancels() {
        assert_eq!(UrlKind::Link.command(""), None);
        assert_eq!(UrlKind::Image.command("   "), None);
    }

    #[test]
    fn test_url_is_trimmed() {
        assert_eq!(
            UrlKind::Link.command(" https://example.com "),
            Some(FormatCommand::Link("https://example.com".to_string()))
        );
        assert_eq!(
            UrlKind::Image.command("a.png"),
            Some(FormatCommand::Image("a.png".to_string()))
        );
    }
}
