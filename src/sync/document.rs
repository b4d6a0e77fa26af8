//! Document model shared by all three views

use serde::{Deserialize, Serialize};

/// Document shown on first launch.
pub const INITIAL_DOCUMENT: &str = r#"# Welcome to Marksync

This is a **full-featured** markdown editor built with [egui](https://www.egui.rs) and [comrak](https://github.com/kivikakk/comrak).

## Features

- **WYSIWYG editing** with real-time preview
- **Markdown source** editing mode
- **Export** to `.md` file
- Syntax highlighted **code blocks**
- **Task lists** for todos
- **Tables** support

### Code Example

```javascript
function hello() {
  console.log("Hello, World!");
}
```

### Task List

- [x] Set up the editor
- [x] Wire up the preview
- [ ] Build something amazing

> Start editing to see the magic happen!
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Modes
// ─────────────────────────────────────────────────────────────────────────────

/// Which surface owns the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditingMode {
    /// The rich editor is authoritative
    #[default]
    Wysiwyg,
    /// The markdown string is authoritative
    Source,
}

impl EditingMode {
    pub fn label(&self) -> &'static str {
        match self {
            EditingMode::Wysiwyg => "WYSIWYG",
            EditingMode::Source => "Markdown",
        }
    }
}

/// How the preview pane presents the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    #[default]
    Rendered,
    /// Pretty-printed, highlighted HTML
    HtmlSource,
}

impl PreviewMode {
    pub fn label(&self) -> &'static str {
        match self {
            PreviewMode::Rendered => "Preview",
            PreviewMode::HtmlSource => "HTML",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DocumentState
// ─────────────────────────────────────────────────────────────────────────────

/// The markdown document and which surface currently owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentState {
    markdown: String,
    mode: EditingMode,
    revision: u64,
}

impl DocumentState {
    pub fn new(markdown: impl Into<String>, mode: EditingMode) -> Self {
        Self {
            markdown: markdown.into(),
            mode,
            revision: 0,
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn mode(&self) -> EditingMode {
        self.mode
    }

    /// Number of effective changes since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the markdown. Returns `false` when the text is unchanged.
    pub(super) fn set_markdown(&mut self, markdown: String) -> bool {
        if self.markdown == markdown {
            return false;
        }
        self.markdown = markdown;
        self.revision += 1;
        true
    }

    pub(super) fn set_mode(&mut self, mode: EditingMode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_write_is_not_a_change() {
        let mut doc = DocumentState::new("a", EditingMode::Source);
        assert!(!doc.set_markdown("a".to_string()));
        assert_eq!(doc.revision(), 0);

        assert!(doc.set_markdown("b".to_string()));
        assert_eq!(doc.revision(), 1);
        assert_eq!(doc.markdown(), "b");
    }

    #[test]
    fn test_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&PreviewMode::HtmlSource).unwrap(),
            "\"html_source\""
        );
        assert_eq!(
            serde_json::from_str::<EditingMode>("\"wysiwyg\"").unwrap(),
            EditingMode::Wysiwyg
        );
    }
}
