//! Theme System for Marksync
//!
//! Colors used when painting the editor, the preview and the HTML-source
//! view. The `Theme` enum in `config::settings` (Light/Dark/System) selects
//! which palette is used at runtime.
//!
//! # Usage
//!
//! ```ignore
//! use crate::theme::ThemeColors;
//! use crate::config::Theme;
//!
//! let colors = ThemeColors::from_theme(Theme::Dark, &ctx.style().visuals);
//! ui.label(RichText::new("Hello").color(colors.text.muted));
//! ```

mod manager;

pub use manager::ThemeManager;

use eframe::egui::Color32;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub text: TextColors,
    pub editor: EditorThemeColors,
    pub syntax: SyntaxColors,
}

impl ThemeColors {
    /// Create theme colors for the given theme variant, resolving `System`
    /// from the current visuals.
    pub fn from_theme(theme: crate::config::Theme, visuals: &eframe::egui::Visuals) -> Self {
        match theme {
            crate::config::Theme::Dark => Self::dark(),
            crate::config::Theme::Light => Self::light(),
            crate::config::Theme::System => {
                if visuals.dark_mode {
                    Self::dark()
                } else {
                    Self::light()
                }
            }
        }
    }

    pub fn light() -> Self {
        Self {
            text: TextColors::light(),
            editor: EditorThemeColors::light(),
            syntax: SyntaxColors::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            text: TextColors::dark(),
            editor: EditorThemeColors::dark(),
            syntax: SyntaxColors::dark(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.text.primary.r() > 128
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Colors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    pub primary: Color32,
    /// Placeholders, status bar, group labels
    pub muted: Color32,
    pub link: Color32,
}

impl TextColors {
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(30, 30, 30),
            muted: Color32::from_rgb(140, 140, 140),
            link: Color32::from_rgb(0, 102, 204),
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(220, 220, 220),
            muted: Color32::from_rgb(120, 120, 120),
            link: Color32::from_rgb(100, 170, 255),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Colors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorThemeColors {
    pub code_block_bg: Color32,
    pub blockquote_border: Color32,
    pub rule: Color32,
}

impl EditorThemeColors {
    pub fn light() -> Self {
        Self {
            code_block_bg: Color32::from_rgb(246, 248, 250),
            blockquote_border: Color32::from_rgb(200, 200, 200),
            rule: Color32::from_rgb(210, 210, 210),
        }
    }

    pub fn dark() -> Self {
        Self {
            code_block_bg: Color32::from_rgb(35, 38, 42),
            blockquote_border: Color32::from_rgb(80, 80, 80),
            rule: Color32::from_rgb(70, 70, 70),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Colors for highlighted HTML source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntaxColors {
    /// Tag names (`div`, `p`) and keywords in code blocks
    pub tag: Color32,
    pub attribute: Color32,
    pub string: Color32,
    pub comment: Color32,
    /// Character entities (`&amp;`) and other constants
    pub entity: Color32,
    /// Angle brackets and `=`
    pub punctuation: Color32,
    pub plain: Color32,
}

impl SyntaxColors {
    pub fn light() -> Self {
        Self {
            tag: Color32::from_rgb(175, 0, 175),
            attribute: Color32::from_rgb(0, 100, 150),
            string: Color32::from_rgb(0, 128, 0),
            comment: Color32::from_rgb(128, 128, 128),
            entity: Color32::from_rgb(0, 128, 128),
            punctuation: Color32::from_rgb(100, 100, 100),
            plain: Color32::from_rgb(50, 50, 50),
        }
    }

    pub fn dark() -> Self {
        Self {
            tag: Color32::from_rgb(198, 120, 221),
            attribute: Color32::from_rgb(229, 192, 123),
            string: Color32::from_rgb(152, 195, 121),
            comment: Color32::from_rgb(92, 99, 112),
            entity: Color32::from_rgb(209, 154, 102),
            punctuation: Color32::from_rgb(150, 150, 150),
            plain: Color32::from_rgb(171, 178, 191),
        }
    }

    /// Pick a color for a token from its class names.
    ///
    /// Classes are scope atoms (`entity`, `name`, `tag`, ...) from every open
    /// scope, so the most specific match is checked first.
    pub fn for_classes<S: AsRef<str>>(&self, classes: &[S]) -> Color32 {
        let has = |name: &str| classes.iter().any(|c| c.as_ref() == name);

        if has("comment") {
            self.comment
        } else if has("string") {
            self.string
        } else if has("attribute-name") {
            self.attribute
        } else if (has("entity") && has("tag")) || has("keyword") || has("storage") {
            self.tag
        } else if has("constant") {
            self.entity
        } else if has("punctuation") {
            self.punctuation
        } else {
            self.plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_dark() {
        assert!(ThemeColors::dark().is_dark());
        assert!(!ThemeColors::light().is_dark());
    }

    #[test]
    fn test_from_theme_resolves_system() {
        let dark = eframe::egui::Visuals::dark();
        let light = eframe::egui::Visuals::light();
        assert_eq!(
            ThemeColors::from_theme(crate::config::Theme::System, &dark),
            ThemeColors::dark()
        );
        assert_eq!(
            ThemeColors::from_theme(crate::config::Theme::System, &light),
            ThemeColors::light()
        );
    }

    #[test]
    fn test_syntax_color_for_classes() {
        let syntax = SyntaxColors::light();
        assert_eq!(
            syntax.for_classes(&["entity", "name", "tag", "html"]),
            syntax.tag
        );
        assert_eq!(
            syntax.for_classes(&["string", "quoted", "double", "html"]),
            syntax.string
        );
        assert_eq!(
            syntax.for_classes(&["punctuation", "definition", "tag"]),
            syntax.punctuation
        );
        assert_eq!(syntax.for_classes::<&str>(&[]), syntax.plain);
    }
}
