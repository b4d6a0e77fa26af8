//! Inline formatting operations
//!
//! These functions work on the inline markdown of a single block (the text of
//! a paragraph, heading, list item, ...). Block-level changes such as turning
//! a paragraph into a heading live in `rich::document`; this module only
//! deals with delimiters inside a line of text.
//!
//! # Example
//! ```ignore
//! use crate::markdown::formatting::{toggle_inline, InlineMarker};
//!
//! let result = toggle_inline("Hello world", (0, 5), InlineMarker::Bold);
//! assert_eq!(result.text, "**Hello** world");
//! ```

use super::parser::{parse_markdown, MarkdownNode, MarkdownNodeType};
use crate::string_utils::{ceil_char_boundary, floor_char_boundary};
use std::ops::Range;

// ─────────────────────────────────────────────────────────────────────────────
// Inline Markers
// ─────────────────────────────────────────────────────────────────────────────

/// Delimiter-based inline formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineMarker {
    /// `**text**`
    Bold,
    /// `*text*`
    Italic,
    /// `~~text~~`
    Strikethrough,
    /// `` `text` ``
    Code,
}

impl InlineMarker {
    /// The delimiter written on both sides of the text.
    pub fn delimiter(&self) -> &'static str {
        match self {
            InlineMarker::Bold => "**",
            InlineMarker::Italic => "*",
            InlineMarker::Strikethrough => "~~",
            InlineMarker::Code => "`",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of applying an inline formatting operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The new text
    pub text: String,
    /// New selection as a byte range into `text`
    pub selection: (usize, usize),
    /// `false` when formatting was removed instead of added
    pub applied: bool,
}

impl FormatResult {
    fn applied(text: String, start: usize, end: usize) -> Self {
        Self {
            text,
            selection: (start, end),
            applied: true,
        }
    }

    fn removed(text: String, start: usize, end: usize) -> Self {
        Self {
            text,
            selection: (start, end),
            applied: false,
        }
    }
}

/// Clamp and sort a byte selection onto character boundaries of `text`.
fn normalize_selection(text: &str, selection: (usize, usize)) -> (usize, usize) {
    let (a, b) = selection;
    let (a, b) = if a > b { (b, a) } else { (a, b) };
    (
        floor_char_boundary(text, a.min(text.len())),
        ceil_char_boundary(text, b.min(text.len())),
    )
}

/// Byte range of the word touching `cursor`, if any.
fn word_at(text: &str, cursor: usize) -> Option<(usize, usize)> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_' || c == '\'';

    let start = text[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(cursor);
    let end = text[cursor..]
        .char_indices()
        .find(|(_, c)| !is_word(*c))
        .map(|(i, _)| cursor + i)
        .unwrap_or(text.len());

    (start < end).then_some((start, end))
}

// ─────────────────────────────────────────────────────────────────────────────
// Toggle Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Add or remove an inline delimiter around a byte selection.
///
/// - a selection already wrapped in the delimiter is unwrapped
/// - a selection surrounded by the delimiter has the surrounding pair removed
/// - an empty selection expands to the word under the cursor
/// - with no word under the cursor, an empty pair is inserted with the cursor inside
pub fn toggle_inline(text: &str, selection: (usize, usize), marker: InlineMarker) -> FormatResult {
    let delim = marker.delimiter();
    let (mut start, mut end) = normalize_selection(text, selection);

    if start == end {
        match word_at(text, start) {
            Some((ws, we)) => {
                start = ws;
                end = we;
            }
            None => {
                let new_text = format!("{}{}{}{}", &text[..start], delim, delim, &text[start..]);
                let cursor = start + delim.len();
                return FormatResult::applied(new_text, cursor, cursor);
            }
        }
    }

    let selected = &text[start..end];

    // Selection includes the delimiters
    if selected.len() >= delim.len() * 2
        && selected.starts_with(delim)
        && selected.ends_with(delim)
    {
        let inner = &selected[delim.len()..selected.len() - delim.len()];
        let new_text = format!("{}{}{}", &text[..start], inner, &text[end..]);
        return FormatResult::removed(new_text, start, start + inner.len());
    }

    // Delimiters sit right outside the selection
    if start >= delim.len()
        && text[..start].ends_with(delim)
        && text[end..].starts_with(delim)
    {
        let outer_start = start - delim.len();
        let outer_end = end + delim.len();
        let new_text = format!("{}{}{}", &text[..outer_start], selected, &text[outer_end..]);
        return FormatResult::removed(new_text, outer_start, outer_start + selected.len());
    }

    let new_text = format!(
        "{}{}{}{}{}",
        &text[..start],
        delim,
        selected,
        delim,
        &text[end..]
    );
    let inner_start = start + delim.len();
    FormatResult::applied(new_text, inner_start, inner_start + selected.len())
}

/// Insert a link or image at the selection.
///
/// The selected text becomes the link text (or image alt text). Without a
/// selection, links use the URL as their text and images get an empty alt.
pub fn insert_link(
    text: &str,
    selection: (usize, usize),
    url: &str,
    is_image: bool,
) -> FormatResult {
    let (start, end) = normalize_selection(text, selection);
    let selected = &text[start..end];
    let label = if selected.is_empty() && !is_image {
        url
    } else {
        selected
    };
    let prefix = if is_image { "![" } else { "[" };

    let inserted = format!("{}{}]({})", prefix, label, url);
    let new_text = format!("{}{}{}", &text[..start], inserted, &text[end..]);
    let cursor = start + inserted.len();
    FormatResult::applied(new_text, cursor, cursor)
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Runs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Bold,
    Italic,
    Strikethrough,
    Code,
    Link,
}

/// An inline construct comrak found in the text.
#[derive(Debug, Clone)]
struct InlineRun {
    kind: RunKind,
    /// Byte range including the delimiters
    outer: Range<usize>,
    /// Byte range of the content between the delimiters
    inner: Range<usize>,
    /// Destination of links
    url: Option<String>,
}

/// Parse inline markdown and collect its styled constructs.
fn inline_runs(text: &str) -> Vec<InlineRun> {
    if text.is_empty() {
        return Vec::new();
    }
    let doc = parse_markdown(text);
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let mut runs = Vec::new();
    collect_runs(&doc.root, text, &line_starts, &mut runs);
    runs
}

/// Byte offset of a 1-indexed line and byte column.
fn byte_offset(text: &str, line_starts: &[usize], line: usize, column: usize) -> Option<usize> {
    let start = *line_starts.get(line.checked_sub(1)?)?;
    let offset = start + column.checked_sub(1)?;
    (offset < text.len() && text.is_char_boundary(offset)).then_some(offset)
}

fn collect_runs(node: &MarkdownNode, text: &str, line_starts: &[usize], runs: &mut Vec<InlineRun>) {
    let kind = match &node.node_type {
        MarkdownNodeType::Strong => Some(RunKind::Bold),
        MarkdownNodeType::Emphasis => Some(RunKind::Italic),
        MarkdownNodeType::Strikethrough => Some(RunKind::Strikethrough),
        MarkdownNodeType::Code(_) => Some(RunKind::Code),
        MarkdownNodeType::Link { .. } => Some(RunKind::Link),
        _ => None,
    };

    if let Some(kind) = kind {
        let start = byte_offset(text, line_starts, node.start_line, node.start_column);
        let last = byte_offset(text, line_starts, node.end_line, node.end_column);
        if let (Some(start), Some(last)) = (start, last) {
            if start <= last {
                let end = ceil_char_boundary(text, last + 1);
                if let Some(run) = make_run(kind, text, start..end, node) {
                    runs.push(run);
                }
            }
        }
    }

    for child in &node.children {
        collect_runs(child, text, line_starts, runs);
    }
}

fn make_run(kind: RunKind, text: &str, span: Range<usize>, node: &MarkdownNode) -> Option<InlineRun> {
    let bytes = text.as_bytes();
    let (outer, inner) = match kind {
        // comrak positions code spans on their content; the backticks sit outside
        RunKind::Code => {
            let mut open = span.start;
            while open > 0 && bytes[open - 1] == b'`' {
                open -= 1;
            }
            let mut close = span.end;
            while close < bytes.len() && bytes[close] == b'`' {
                close += 1;
            }
            (open..close, span)
        }
        RunKind::Link => (span.clone(), span),
        RunKind::Bold | RunKind::Italic | RunKind::Strikethrough => {
            let width = match kind {
                RunKind::Bold => 2,
                RunKind::Italic => 1,
                _ => bytes[span.clone()].iter().take_while(|&&b| b == b'~').count(),
            };
            if span.len() < width * 2 {
                return None;
            }
            (span.clone(), span.start + width..span.end - width)
        }
    };
    let url = match &node.node_type {
        MarkdownNodeType::Link { url, .. } => Some(url.clone()),
        _ => None,
    };
    Some(InlineRun {
        kind,
        outer,
        inner,
        url,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting State Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Inline formats active at a cursor position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineState {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: bool,
}

/// Detect which inline formats surround a byte cursor position.
///
/// A cursor at either edge of a run's content counts as inside it.
pub fn detect_inline_state(text: &str, cursor: usize) -> InlineState {
    let cursor = floor_char_boundary(text, cursor.min(text.len()));
    let mut state = InlineState::default();

    for run in inline_runs(text) {
        let inside = match run.kind {
            RunKind::Link => run.outer.start < cursor && cursor < run.outer.end,
            _ => run.inner.start <= cursor && cursor <= run.inner.end,
        };
        if !inside {
            continue;
        }
        match run.kind {
            RunKind::Bold => state.bold = true,
            RunKind::Italic => state.italic = true,
            RunKind::Strikethrough => state.strikethrough = true,
            RunKind::Code => state.code = true,
            RunKind::Link => state.link = true,
        }
    }
    state
}

/// Destination of the link under a byte cursor position.
pub fn link_at(text: &str, cursor: usize) -> Option<String> {
    inline_runs(text)
        .into_iter()
        .filter(|run| run.kind == RunKind::Link)
        .find(|run| run.outer.start <= cursor && cursor < run.outer.end)
        .and_then(|run| run.url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Styled Spans
// ─────────────────────────────────────────────────────────────────────────────

/// Visual style of a run of inline markdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: bool,
    /// The run is a delimiter (`**`, `~~`, ...) rather than content
    pub marker: bool,
}

/// A styled byte range of inline markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub range: Range<usize>,
    pub style: InlineStyle,
}

/// Split inline markdown into styled runs covering the whole text.
///
/// Styles follow comrak's inline parse, so unmatched or intraword delimiters
/// stay literal. Delimiters keep the style of the text around them.
pub fn style_spans(text: &str) -> Vec<StyledSpan> {
    let mut styles = vec![InlineStyle::default(); text.len()];

    for run in inline_runs(text) {
        for style in &mut styles[run.inner.clone()] {
            match run.kind {
                RunKind::Bold => style.bold = true,
                RunKind::Italic => style.italic = true,
                RunKind::Strikethrough => style.strikethrough = true,
                RunKind::Code => style.code = true,
                RunKind::Link => style.link = true,
            }
        }
        for i in (run.outer.start..run.inner.start).chain(run.inner.end..run.outer.end) {
            styles[i].marker = true;
        }
    }

    let mut spans = Vec::new();
    let mut start = 0;
    for i in 1..=text.len() {
        if i == text.len() || (styles[i] != styles[start] && text.is_char_boundary(i)) {
            spans.push(StyledSpan {
                range: start..i,
                style: styles[start],
            });
            start = i;
        }
    }
    spans
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
