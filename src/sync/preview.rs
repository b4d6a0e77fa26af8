//! Preview pane state
//!
//! The preview owns a read-only rich editor instance that is reloaded from
//! the document whenever the debounced refresh fires. In HTML-source mode it
//! also keeps a pretty-printed, tokenized copy of the rendered HTML.

use super::debounce::Debouncer;
use super::document::PreviewMode;
use crate::html::{pretty_print, render, TaggedNode};
use crate::markdown::Tokenizer;
use crate::rich::RichEditor;
use log::debug;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Source View
// ─────────────────────────────────────────────────────────────────────────────

/// The preview's HTML, formatted for reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlSourceView {
    /// Pretty-printed HTML, as copied to the clipboard
    pub formatted: String,
    /// Tokenizer output for `formatted`
    pub tree: TaggedNode,
    /// `tree` rendered to class-tagged markup
    pub highlighted: String,
}

impl HtmlSourceView {
    pub fn build(html: &str, tokenizer: &dyn Tokenizer) -> Self {
        let formatted = pretty_print(html);
        let tree = tokenizer.highlight("html", &formatted);
        let highlighted = render(&tree);
        Self {
            formatted,
            tree,
            highlighted,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PreviewPane
// ─────────────────────────────────────────────────────────────────────────────

/// Preview pane with an optional (not yet mounted) rich instance.
#[derive(Debug)]
pub struct PreviewPane<R> {
    editor: Option<R>,
    mode: PreviewMode,
    debouncer: Debouncer,
    html_view: Option<HtmlSourceView>,
    refreshes: u64,
}

impl<R: RichEditor> PreviewPane<R> {
    pub fn new(delay: Duration, mode: PreviewMode) -> Self {
        Self {
            editor: None,
            mode,
            debouncer: Debouncer::new(delay),
            html_view: None,
            refreshes: 0,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.editor.is_some()
    }

    pub fn editor(&self) -> Option<&R> {
        self.editor.as_ref()
    }

    /// Mutable access for the view. The instance is expected to be read-only.
    pub fn editor_mut(&mut self) -> Option<&mut R> {
        self.editor.as_mut()
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    /// The HTML view, present in HTML-source mode once the pane has content.
    pub fn html_view(&self) -> Option<&HtmlSourceView> {
        self.html_view.as_ref()
    }

    /// Number of times the pane has been reloaded.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn refresh_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub(super) fn debouncer_mut(&mut self) -> &mut Debouncer {
        &mut self.debouncer
    }

    pub(super) fn mount(&mut self, editor: R) -> Option<R> {
        self.editor.replace(editor)
    }

    pub(super) fn unmount(&mut self) -> Option<R> {
        self.html_view = None;
        self.editor.take()
    }

    pub(super) fn set_mode(&mut self, mode: PreviewMode, tokenizer: &dyn Tokenizer) {
        self.mode = mode;
        match mode {
            PreviewMode::HtmlSource => self.rebuild_html_view(tokenizer),
            PreviewMode::Rendered => self.html_view = None,
        }
    }

    /// Load `markdown` into the rich instance. No-op while unmounted.
    pub(super) fn refresh(&mut self, markdown: &str, tokenizer: &dyn Tokenizer) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.set_markdown(markdown);
        self.refreshes += 1;
        debug!("Preview refreshed ({} bytes)", markdown.len());

        if self.mode == PreviewMode::HtmlSource {
            self.rebuild_html_view(tokenizer);
        }
    }

    fn rebuild_html_view(&mut self, tokenizer: &dyn Tokenizer) {
        self.html_view = self
            .editor
            .as_ref()
            .map(|editor| HtmlSourceView::build(&editor.get_html(), tokenizer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlainTokenizer;

    impl Tokenizer for PlainTokenizer {
        fn highlight(&self, _language: &str, text: &str) -> TaggedNode {
            TaggedNode::root(vec![TaggedNode::text(text)])
        }
    }

    #[test]
    fn test_html_source_view_build() {
        let view = HtmlSourceView::build("<div><p>a & b</p></div>", &PlainTokenizer);
        assert_eq!(view.formatted, "<div>\n  <p>\n    a & b\n  </p>\n</div>");
        assert_eq!(view.tree.text_content(), view.formatted);
        assert!(view.highlighted.starts_with("&lt;div&gt;"));
        assert!(view.highlighted.contains("a &amp; b"));
    }
}
