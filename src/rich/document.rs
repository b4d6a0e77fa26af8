//! Block-structured rich document
//!
//! The WYSIWYG surface edits a flat list of blocks rather than the markdown
//! string. Each block keeps its inline markdown (`**bold**` stays as typed)
//! together with the containers it sits in, so the document can be turned
//! back into markdown without losing list nesting, quotes or tightness.
//!
//! Parsing goes through comrak (see `markdown::parser`); inline text is sliced
//! from the source lines using the node source positions.

use super::commands::{FormatCommand, Mark};
use super::RichEditor;
use crate::markdown::formatting::{self, InlineMarker};
use crate::markdown::{
    parse_markdown, render_to_html, HeadingLevel, ListType, MarkdownNode, MarkdownNodeType,
};
use crate::string_utils::floor_char_boundary;
use log::debug;

/// Table inserted by the toolbar: a header row and two body rows.
const TABLE_TEMPLATE: &str = "| Column 1 | Column 2 | Column 3 |\n\
                              | --- | --- | --- |\n\
                              |  |  |  |\n\
                              |  |  |  |";

// ─────────────────────────────────────────────────────────────────────────────
// Block Types
// ─────────────────────────────────────────────────────────────────────────────

/// A container wrapping a block, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// `> ` blockquote level
    Quote,
    /// Content indentation inside a list item
    Indent(usize),
}

/// Marker of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet(char),
    Ordered { number: u32, delimiter: char },
}

impl ListMarker {
    /// The marker as written, without the trailing space.
    pub fn render(&self) -> String {
        match self {
            ListMarker::Bullet(c) => c.to_string(),
            ListMarker::Ordered { number, delimiter } => format!("{}{}", number, delimiter),
        }
    }

    /// Column where the item content starts.
    pub fn width(&self) -> usize {
        self.render().len() + 1
    }

    /// Whether two items with these markers belong to the same list.
    fn same_list(&self, other: &ListMarker) -> bool {
        match (self, other) {
            (ListMarker::Bullet(a), ListMarker::Bullet(b)) => a == b,
            (
                ListMarker::Ordered { delimiter: a, .. },
                ListMarker::Ordered { delimiter: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// Kind of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(HeadingLevel),
    /// List item; `task` is `Some(checked)` for task items
    ListItem {
        marker: ListMarker,
        task: Option<bool>,
    },
    CodeBlock {
        info: String,
    },
    Rule,
    /// GFM table, edited as raw markdown rows
    Table,
    Html,
    FrontMatter,
    /// Block kinds without a dedicated editor, kept verbatim
    Raw,
}

impl BlockKind {
    /// Whether the block text is inline markdown.
    pub fn has_inline_text(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph | BlockKind::Heading(_) | BlockKind::ListItem { .. }
        )
    }
}

/// A block of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Inline markdown for text blocks, raw content otherwise
    pub text: String,
    pub containers: Vec<Container>,
    /// Joined to the previous block by a single newline (tight list)
    pub tight_with_prev: bool,
}

impl Block {
    fn new(kind: BlockKind, text: impl Into<String>, containers: Vec<Container>) -> Self {
        Self {
            kind,
            text: text.into(),
            containers,
            tight_with_prev: false,
        }
    }

    /// Number of enclosing blockquotes.
    pub fn quote_depth(&self) -> usize {
        self.containers
            .iter()
            .filter(|c| matches!(c, Container::Quote))
            .count()
    }

    fn markdown_lines(&self) -> Vec<String> {
        match &self.kind {
            BlockKind::Heading(level) => {
                let hashes = "#".repeat(*level as usize);
                let text = self.text.replace('\n', " ");
                let text = text.trim();
                if text.is_empty() {
                    vec![hashes]
                } else {
                    vec![format!("{} {}", hashes, text)]
                }
            }
            BlockKind::ListItem { marker, task } => {
                let mut head = format!("{} ", marker.render());
                if let Some(checked) = task {
                    head.push_str(if *checked { "[x] " } else { "[ ] " });
                }
                let pad = " ".repeat(marker.width());
                self.text
                    .split('\n')
                    .enumerate()
                    .map(|(i, line)| match i {
                        0 => format!("{}{}", head, line),
                        _ if line.is_empty() => String::new(),
                        _ => format!("{}{}", pad, line),
                    })
                    .collect()
            }
            BlockKind::CodeBlock { info } => {
                let fence = fence_for(&self.text);
                let mut lines = vec![format!("{}{}", fence, info)];
                if !self.text.is_empty() {
                    lines.extend(self.text.split('\n').map(str::to_string));
                }
                lines.push(fence);
                lines
            }
            // A tight `---` under a paragraph would read as a setext underline
            BlockKind::Rule if self.tight_with_prev => vec!["***".to_string()],
            BlockKind::Rule => vec!["---".to_string()],
            BlockKind::Paragraph
            | BlockKind::Table
            | BlockKind::Html
            | BlockKind::FrontMatter
            | BlockKind::Raw => self.text.split('\n').map(str::to_string).collect(),
        }
    }

    fn write_markdown(&self, out: &mut String) {
        let prefix = container_prefix(&self.containers);
        for (i, line) in self.markdown_lines().iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if line.is_empty() {
                out.push_str(prefix.trim_end());
            } else {
                out.push_str(&prefix);
                out.push_str(line);
            }
        }
    }
}

/// Fence long enough not to be closed by backticks inside the code.
fn fence_for(code: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn container_prefix(containers: &[Container]) -> String {
    containers
        .iter()
        .map(|c| match c {
            Container::Quote => "> ".to_string(),
            Container::Indent(n) => " ".repeat(*n),
        })
        .collect()
}

/// Separator line between two loosely joined blocks.
fn blank_line(prev: &[Container], next: &[Container]) -> String {
    let shared = prev
        .iter()
        .zip(next)
        .take_while(|(a, b)| a == b)
        .count();
    container_prefix(&next[..shared]).trim_end().to_string()
}

/// Serialize blocks back to markdown.
pub fn serialize(blocks: &[Block]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            if !block.tight_with_prev {
                out.push_str(&blank_line(&blocks[i - 1].containers, &block.containers));
                out.push('\n');
            }
        }
        block.write_markdown(&mut out);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct Context {
    containers: Vec<Container>,
    /// Enclosing lists, outermost first: (id, tight)
    lists: Vec<(usize, bool)>,
}

impl Context {
    fn with_container(&self, container: Container) -> Self {
        let mut ctx = self.clone();
        ctx.containers.push(container);
        ctx
    }

    fn quote_depth(&self) -> usize {
        self.containers
            .iter()
            .filter(|c| matches!(c, Container::Quote))
            .count()
    }
}

struct BlockBuilder<'a> {
    lines: Vec<&'a str>,
    blocks: Vec<Block>,
    prev_lists: Vec<(usize, bool)>,
    next_list_id: usize,
}

/// Parse markdown into blocks.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let doc = parse_markdown(markdown);
    let mut builder = BlockBuilder {
        lines: doc.source.lines().collect(),
        blocks: Vec::new(),
        prev_lists: Vec::new(),
        next_list_id: 0,
    };
    let end = builder.lines.len();
    builder.walk_children(&doc.root.children, 1, end, &Context::default());
    builder.blocks
}

impl<'a> BlockBuilder<'a> {
    fn walk(&mut self, node: &MarkdownNode, ctx: &Context) {
        match &node.node_type {
            MarkdownNodeType::Document | MarkdownNodeType::Item | MarkdownNodeType::TaskItem { .. } => {
                self.walk_children(&node.children, node.start_line, node.end_line, ctx);
            }
            MarkdownNodeType::BlockQuote => {
                let inner = ctx.with_container(Container::Quote);
                self.walk_children(&node.children, node.start_line, node.end_line, &inner);
            }
            MarkdownNodeType::List { list_type, tight } => {
                let mut inner = ctx.clone();
                inner.lists.push((self.next_list_id, *tight));
                self.next_list_id += 1;
                for (i, item) in node.children.iter().enumerate() {
                    self.list_item(item, *list_type, i as u32, &inner);
                }
            }
            MarkdownNodeType::Paragraph => {
                let text = self.inline_text(node, ctx, false);
                self.push(BlockKind::Paragraph, text, ctx);
            }
            MarkdownNodeType::Heading { level, setext } => {
                let text = self.heading_text(node, ctx, *setext);
                self.push(BlockKind::Heading(*level), text, ctx);
            }
            MarkdownNodeType::CodeBlock { info, literal } => {
                let text = literal.strip_suffix('\n').unwrap_or(literal);
                let kind = BlockKind::CodeBlock { info: info.clone() };
                self.push(kind, text.to_string(), ctx);
            }
            MarkdownNodeType::ThematicBreak => self.push(BlockKind::Rule, String::new(), ctx),
            MarkdownNodeType::Table { .. } => {
                let text = self.raw_text(node, ctx);
                self.push(BlockKind::Table, text, ctx);
            }
            MarkdownNodeType::HtmlBlock(literal) => {
                let text = literal.trim_end_matches('\n').to_string();
                self.push(BlockKind::Html, text, ctx);
            }
            MarkdownNodeType::FrontMatter(content) => {
                self.push(BlockKind::FrontMatter, content.trim_end().to_string(), ctx);
            }
            _ => {
                let text = self.raw_text(node, ctx);
                if !text.is_empty() {
                    self.push(BlockKind::Raw, text, ctx);
                }
            }
        }
    }

    /// Walk `children` of a container spanning lines `start..=end`, keeping
    /// the reference definitions comrak drops from the tree.
    fn walk_children(&mut self, children: &[MarkdownNode], start: usize, end: usize, ctx: &Context) {
        let mut next_line = start;
        for child in children {
            self.keep_definitions(next_line, child.start_line.saturating_sub(1), ctx);
            self.walk(child, ctx);
            next_line = next_line.max(child.end_line + 1);
        }
        self.keep_definitions(next_line, end, ctx);
    }

    /// Push link reference definitions found on lines `start..=end` as raw
    /// blocks. Those lines hold no parsed node.
    fn keep_definitions(&mut self, start: usize, end: usize, ctx: &Context) {
        let depth = ctx.quote_depth();
        let end = end.min(self.lines.len());
        let mut chunk: Vec<&'a str> = Vec::new();

        for line_no in start.max(1)..=end + 1 {
            let line = match line_no.checked_sub(1).and_then(|i| self.lines.get(i).copied()) {
                Some(line) if line_no <= end => strip_quote_markers(line, depth).trim(),
                _ => "",
            };
            if !line.is_empty() {
                chunk.push(line);
                continue;
            }
            if chunk.first().is_some_and(|first| is_reference_definition(first)) {
                debug!("Keeping {} reference definition line(s)", chunk.len());
                self.push(BlockKind::Raw, chunk.join("\n"), ctx);
                // Joined tightly it would continue the previous paragraph
                if let Some(block) = self.blocks.last_mut() {
                    block.tight_with_prev = false;
                }
            }
            chunk.clear();
        }
    }

    fn list_item(&mut self, item: &MarkdownNode, list_type: ListType, index: u32, ctx: &Context) {
        let marker = match list_type {
            ListType::Bullet { marker } => ListMarker::Bullet(marker),
            ListType::Ordered { start, delimiter } => ListMarker::Ordered {
                number: start + index,
                delimiter,
            },
        };
        let task = match item.node_type {
            MarkdownNodeType::TaskItem { checked } => Some(checked),
            _ => None,
        };

        let definition = match task {
            None => self.item_definition(item, &marker, ctx),
            Some(_) => String::new(),
        };
        let (text, rest, next_line) = match item.children.split_first() {
            Some((first, rest))
                if first.node_type == MarkdownNodeType::Paragraph
                    && (first.start_line == item.start_line || definition.is_empty()) =>
            {
                let text = self.inline_text(first, ctx, task.is_some());
                (text, rest, first.end_line + 1)
            }
            _ => (definition, item.children.as_slice(), item.start_line + 1),
        };
        self.push(BlockKind::ListItem { marker, task }, text, ctx);

        let inner = ctx.with_container(Container::Indent(marker.width()));
        self.walk_children(rest, next_line, item.end_line, &inner);
    }

    /// A reference definition on the marker line leaves the item without a
    /// paragraph; keep it as the item text.
    fn item_definition(&self, item: &MarkdownNode, marker: &ListMarker, ctx: &Context) -> String {
        let line = self
            .content_lines(item.start_line, item.start_line, item.start_column, ctx)
            .first()
            .copied()
            .unwrap_or("");
        line.trim_start()
            .strip_prefix(marker.render().as_str())
            .map(str::trim)
            .filter(|rest| is_reference_definition(rest))
            .unwrap_or("")
            .to_string()
    }

    fn push(&mut self, kind: BlockKind, text: String, ctx: &Context) {
        // Tightness comes from the innermost list both blocks share
        let shared = self
            .prev_lists
            .iter()
            .zip(&ctx.lists)
            .take_while(|(a, b)| a.0 == b.0)
            .last()
            .map(|(a, _)| a.1);
        let tight = !self.blocks.is_empty() && shared.unwrap_or(false);

        self.prev_lists = ctx.lists.clone();
        self.blocks.push(Block {
            kind,
            text,
            containers: ctx.containers.clone(),
            tight_with_prev: tight,
        });
    }

    /// Source lines `start..=end` with container markers removed.
    fn content_lines(&self, start: usize, end: usize, first_column: usize, ctx: &Context) -> Vec<&'a str> {
        let depth = ctx.quote_depth();
        let mut out = Vec::new();
        for line_no in start..=end {
            let Some(line) = line_no
                .checked_sub(1)
                .and_then(|i| self.lines.get(i))
                .copied()
            else {
                break;
            };
            let content = if line_no == start {
                from_column(line, first_column)
            } else {
                strip_quote_markers(line, depth).trim_start()
            };
            out.push(content);
        }
        out
    }

    fn inline_text(&self, node: &MarkdownNode, ctx: &Context, task: bool) -> String {
        let lines = self.content_lines(node.start_line, node.end_line, node.start_column, ctx);
        let text = lines.join("\n");
        let text = text.trim_end();

        if task {
            for checkbox in ["[ ]", "[x]", "[X]"] {
                if let Some(rest) = text.strip_prefix(checkbox) {
                    if rest.is_empty() || rest.starts_with(' ') {
                        return rest.trim_start().to_string();
                    }
                }
            }
        }
        text.to_string()
    }

    fn heading_text(&self, node: &MarkdownNode, ctx: &Context, setext: bool) -> String {
        if setext {
            // The node may run past the underline onto the closing blank line
            let lines = self.content_lines(node.start_line, node.end_line, node.start_column, ctx);
            let mut text: Vec<&str> = Vec::new();
            for line in lines.iter().map(|l| l.trim()) {
                if !text.is_empty() && (line.is_empty() || is_setext_underline(line)) {
                    break;
                }
                text.push(line);
            }
            return text.join(" ");
        }

        let line = self
            .content_lines(node.start_line, node.start_line, node.start_column, ctx)
            .first()
            .copied()
            .unwrap_or("");
        strip_atx(line)
    }

    fn raw_text(&self, node: &MarkdownNode, ctx: &Context) -> String {
        let lines = self.content_lines(node.start_line, node.end_line, node.start_column, ctx);
        lines
            .iter()
            .take_while(|l| !l.trim().is_empty())
            .map(|l| l.trim_start())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Slice a line from a 1-indexed byte column.
fn from_column(line: &str, column: usize) -> &str {
    let index = floor_char_boundary(line, column.saturating_sub(1));
    &line[index..]
}

fn strip_quote_markers(line: &str, depth: usize) -> &str {
    let mut rest = line;
    for _ in 0..depth {
        match rest.trim_start().strip_prefix('>') {
            Some(r) => rest = r.strip_prefix(' ').unwrap_or(r),
            None => break,
        }
    }
    rest
}

fn is_setext_underline(line: &str) -> bool {
    !line.is_empty() && (line.chars().all(|c| c == '=') || line.chars().all(|c| c == '-'))
}

/// Whether a line opens a link reference definition (`[label]: destination`).
fn is_reference_definition(line: &str) -> bool {
    line.starts_with('[')
        && !line.starts_with("[^")
        && line.find("]:").is_some_and(|i| i > 1)
}

/// Heading text of an ATX heading line, without the opening or closing hashes.
fn strip_atx(line: &str) -> String {
    let content = line.trim_start_matches('#').trim();
    let without_closing = content.trim_end_matches('#');
    if without_closing.is_empty() {
        String::new()
    } else if without_closing.ends_with(' ') {
        without_closing.trim_end().to_string()
    } else {
        content.to_string()
    }
}

/// Split edited text into paragraphs at blank lines.
///
/// A trailing empty line is the cursor line, so `"a\n\n"` yields `["a", ""]`.
fn split_paragraphs(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    let mut pieces: Vec<Vec<&str>> = vec![Vec::new()];
    let mut after_separator = false;

    for (i, line) in lines.iter().enumerate() {
        if i < last && line.trim().is_empty() {
            after_separator = true;
            continue;
        }
        if after_separator {
            if pieces.last().is_some_and(|p| !p.is_empty()) {
                pieces.push(Vec::new());
            }
            after_separator = false;
        }
        if let Some(piece) = pieces.last_mut() {
            piece.push(line);
        }
    }

    pieces.into_iter().map(|p| p.join("\n")).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// RichDocument
// ─────────────────────────────────────────────────────────────────────────────

/// Cursor location inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub block: usize,
    /// Byte range into the block text
    pub selection: (usize, usize),
}

#[derive(Debug, Clone, Copy)]
enum ListTarget {
    Bullet,
    Ordered,
    Task,
}

/// The rich editor's document.
#[derive(Debug, Clone)]
pub struct RichDocument {
    blocks: Vec<Block>,
    /// Markdown passed to `set_markdown`, until the first edit
    loaded: Option<String>,
    focus: Option<Focus>,
    focus_requested: bool,
    editable: bool,
}

impl Default for RichDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl RichDocument {
    /// Empty editable document.
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            loaded: None,
            focus: None,
            focus_requested: false,
            editable: true,
        }
    }

    /// Empty document that only accepts content through `set_markdown`.
    pub fn read_only() -> Self {
        Self {
            editable: false,
            ..Self::new()
        }
    }

    /// Editable document loaded from markdown.
    pub fn from_markdown(markdown: &str) -> Self {
        let mut doc = Self::new();
        doc.set_markdown(markdown);
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    /// Record where the cursor is. Offsets are clamped to the block text.
    pub fn set_focus(&mut self, block: usize, selection: (usize, usize)) {
        let Some(b) = self.blocks.get(block) else {
            return;
        };
        let clamp = |i: usize| floor_char_boundary(&b.text, i);
        self.focus = Some(Focus {
            block,
            selection: (clamp(selection.0), clamp(selection.1)),
        });
    }

    /// Focus moved by an edit that the view should follow, if any.
    pub fn take_focus_request(&mut self) -> Option<Focus> {
        if std::mem::take(&mut self.focus_requested) {
            self.focus
        } else {
            None
        }
    }

    fn move_focus(&mut self, block: usize, selection: (usize, usize)) {
        self.set_focus(block, selection);
        self.focus_requested = true;
    }

    /// Make sure there is a block to type into.
    pub fn ensure_block(&mut self) {
        if self.editable && self.blocks.is_empty() {
            self.blocks
                .push(Block::new(BlockKind::Paragraph, String::new(), Vec::new()));
        }
    }

    /// Replace a block's text. A blank line in text blocks splits the block.
    ///
    /// Returns `true` if the document changed.
    pub fn set_block_text(&mut self, index: usize, text: &str) -> bool {
        if !self.editable {
            return false;
        }
        let Some(block) = self.blocks.get_mut(index) else {
            return false;
        };
        if block.text == text {
            return false;
        }
        block.text = text.to_string();
        self.loaded = None;
        self.split_block(index);
        true
    }

    /// Flip the checkbox of a task item.
    pub fn toggle_task(&mut self, index: usize) -> bool {
        if !self.editable {
            return false;
        }
        match self.blocks.get_mut(index).map(|b| &mut b.kind) {
            Some(BlockKind::ListItem {
                task: Some(checked),
                ..
            }) => {
                *checked = !*checked;
                self.loaded = None;
                true
            }
            _ => false,
        }
    }

    fn split_block(&mut self, index: usize) {
        let template = self.blocks[index].clone();
        if !template.kind.has_inline_text() {
            return;
        }

        let mut pieces = split_paragraphs(&template.text);
        if let BlockKind::Heading(_) = template.kind {
            if let Some((first, rest)) = pieces[0].split_once('\n') {
                let (first, rest) = (first.to_string(), rest.to_string());
                pieces[0] = first;
                pieces.insert(1, rest);
            }
        }
        if pieces.len() == 1 {
            return;
        }

        let mut rest = pieces.split_off(1);
        self.blocks[index].text = pieces.remove(0);

        let mut at = index;
        for piece in rest.drain(..) {
            at += 1;
            let kind = match &template.kind {
                BlockKind::ListItem { marker, task } => BlockKind::ListItem {
                    marker: match marker {
                        ListMarker::Ordered { number, delimiter } => ListMarker::Ordered {
                            number: number + (at - index) as u32,
                            delimiter: *delimiter,
                        },
                        bullet => *bullet,
                    },
                    task: task.map(|_| false),
                },
                _ => BlockKind::Paragraph,
            };
            self.blocks
                .insert(at, Block::new(kind, piece, template.containers.clone()));
            self.refresh_tight(at);
        }
        self.refresh_tight(at + 1);

        let end = self.blocks[at].text.len();
        self.move_focus(at, (end, end));
        debug!("Split block {} into {} blocks", index, at - index + 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // List Joins
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether block `i` continues a list item at `i - 1`.
    fn joins_list(&self, i: usize) -> bool {
        let (Some(prev), Some(cur)) = (
            i.checked_sub(1).and_then(|p| self.blocks.get(p)),
            self.blocks.get(i),
        ) else {
            return false;
        };
        match (&prev.kind, &cur.kind) {
            (BlockKind::ListItem { marker: a, .. }, BlockKind::ListItem { marker: b, .. }) => {
                prev.containers == cur.containers && a.same_list(b)
            }
            _ => false,
        }
    }

    /// Recompute whether block `i` is tightly joined after a structural edit.
    fn refresh_tight(&mut self, i: usize) {
        if i >= self.blocks.len() {
            return;
        }
        let tight = if i == 0 {
            false
        } else if self.joins_list(i) {
            // Follow the tightness the list already has
            if self.joins_list(i - 1) {
                self.blocks[i - 1].tight_with_prev
            } else if self.joins_list(i + 1) {
                self.blocks[i + 1].tight_with_prev
            } else {
                true
            }
        } else if self.blocks[i].containers.len() > self.blocks[i - 1].containers.len()
            && self.blocks[i].containers.starts_with(&self.blocks[i - 1].containers)
        {
            self.blocks[i].tight_with_prev
        } else {
            false
        };
        self.blocks[i].tight_with_prev = tight;
    }

    fn insert_after(&mut self, index: usize, block: Block) -> usize {
        let at = (index + 1).min(self.blocks.len());
        self.blocks.insert(at, block);
        self.refresh_tight(at);
        self.refresh_tight(at + 1);
        at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a toolbar command at the current focus.
    ///
    /// Without a focus the command targets the end of the last block.
    /// Returns `true` if the document changed.
    pub fn apply(&mut self, command: &FormatCommand) -> bool {
        if !self.editable {
            return false;
        }
        self.ensure_block();

        let focus = self.focus.unwrap_or_else(|| {
            let block = self.blocks.len() - 1;
            let end = self.blocks[block].text.len();
            Focus {
                block,
                selection: (end, end),
            }
        });
        let index = focus.block.min(self.blocks.len() - 1);

        let changed = match command {
            FormatCommand::Bold => self.toggle_marker(index, focus.selection, InlineMarker::Bold),
            FormatCommand::Italic => {
                self.toggle_marker(index, focus.selection, InlineMarker::Italic)
            }
            FormatCommand::Strikethrough => {
                self.toggle_marker(index, focus.selection, InlineMarker::Strikethrough)
            }
            FormatCommand::InlineCode => {
                self.toggle_marker(index, focus.selection, InlineMarker::Code)
            }
            FormatCommand::Heading(level) => self.toggle_heading(index, *level),
            FormatCommand::BulletList => self.toggle_list(index, ListTarget::Bullet),
            FormatCommand::OrderedList => self.toggle_list(index, ListTarget::Ordered),
            FormatCommand::TaskList => self.toggle_list(index, ListTarget::Task),
            FormatCommand::Blockquote => self.toggle_blockquote(index),
            FormatCommand::CodeBlock => self.toggle_code_block(index),
            FormatCommand::HorizontalRule => self.insert_rule(index),
            FormatCommand::Link(url) => self.insert_link(index, focus.selection, url, false),
            FormatCommand::Image(url) => self.insert_link(index, focus.selection, url, true),
            FormatCommand::Table => {
                let containers = self.blocks[index].containers.clone();
                let at = self.insert_after(
                    index,
                    Block::new(BlockKind::Table, TABLE_TEMPLATE, containers),
                );
                self.move_focus(at, (0, 0));
                true
            }
        };

        if changed {
            self.loaded = None;
            debug!("Applied {} to block {}", command.label(), index);
        }
        changed
    }

    fn toggle_marker(&mut self, index: usize, selection: (usize, usize), marker: InlineMarker) -> bool {
        let block = &mut self.blocks[index];
        if !block.kind.has_inline_text() {
            return false;
        }
        let result = formatting::toggle_inline(&block.text, selection, marker);
        block.text = result.text;
        self.move_focus(index, result.selection);
        true
    }

    fn toggle_heading(&mut self, index: usize, level: HeadingLevel) -> bool {
        let block = &mut self.blocks[index];
        if block.kind == BlockKind::Heading(level) {
            block.kind = BlockKind::Paragraph;
        } else if block.kind.has_inline_text() {
            block.kind = BlockKind::Heading(level);
            block.text = block.text.replace('\n', " ");
        } else {
            return false;
        }
        self.refresh_tight(index);
        self.refresh_tight(index + 1);
        true
    }

    fn toggle_list(&mut self, index: usize, target: ListTarget) -> bool {
        let kind = &self.blocks[index].kind;
        if !kind.has_inline_text() {
            return false;
        }

        let active = matches!(
            (kind, target),
            (
                BlockKind::ListItem {
                    marker: ListMarker::Bullet(_),
                    task: None
                },
                ListTarget::Bullet
            ) | (
                BlockKind::ListItem {
                    marker: ListMarker::Ordered { .. },
                    ..
                },
                ListTarget::Ordered
            ) | (BlockKind::ListItem { task: Some(_), .. }, ListTarget::Task)
        );

        let new_kind = if active {
            BlockKind::Paragraph
        } else {
            match target {
                ListTarget::Bullet => BlockKind::ListItem {
                    marker: self.bullet_marker(index),
                    task: None,
                },
                ListTarget::Ordered => BlockKind::ListItem {
                    marker: ListMarker::Ordered {
                        number: self.next_number(index),
                        delimiter: '.',
                    },
                    task: None,
                },
                ListTarget::Task => BlockKind::ListItem {
                    marker: self.bullet_marker(index),
                    task: Some(false),
                },
            }
        };

        self.blocks[index].kind = new_kind;
        self.refresh_tight(index);
        self.refresh_tight(index + 1);
        true
    }

    fn bullet_marker(&self, index: usize) -> ListMarker {
        match &self.blocks[index].kind {
            BlockKind::ListItem {
                marker: marker @ ListMarker::Bullet(_),
                ..
            } => *marker,
            _ => ListMarker::Bullet('-'),
        }
    }

    fn next_number(&self, index: usize) -> u32 {
        let Some(prev) = index.checked_sub(1).and_then(|p| self.blocks.get(p)) else {
            return 1;
        };
        match prev.kind {
            BlockKind::ListItem {
                marker: ListMarker::Ordered { number, .. },
                ..
            } if prev.containers == self.blocks[index].containers => number + 1,
            _ => 1,
        }
    }

    fn toggle_blockquote(&mut self, index: usize) -> bool {
        let containers = &mut self.blocks[index].containers;
        match containers.iter().position(|c| *c == Container::Quote) {
            Some(pos) => {
                containers.remove(pos);
            }
            None => containers.insert(0, Container::Quote),
        }
        self.refresh_tight(index);
        self.refresh_tight(index + 1);
        true
    }

    fn toggle_code_block(&mut self, index: usize) -> bool {
        let block = &mut self.blocks[index];
        if matches!(block.kind, BlockKind::CodeBlock { .. }) {
            block.kind = BlockKind::Paragraph;
            self.split_block(index);
        } else if block.kind.has_inline_text() {
            block.kind = BlockKind::CodeBlock {
                info: String::new(),
            };
        } else {
            return false;
        }
        self.refresh_tight(index);
        self.refresh_tight(index + 1);
        true
    }

    fn insert_rule(&mut self, index: usize) -> bool {
        let containers = self.blocks[index].containers.clone();
        let at = self.insert_after(index, Block::new(BlockKind::Rule, "", containers.clone()));
        if at + 1 == self.blocks.len() {
            self.insert_after(at, Block::new(BlockKind::Paragraph, "", containers));
        }
        self.move_focus(at + 1, (0, 0));
        true
    }

    fn insert_link(&mut self, index: usize, selection: (usize, usize), url: &str, image: bool) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }

        if self.blocks[index].kind.has_inline_text() {
            let block = &mut self.blocks[index];
            let result = formatting::insert_link(&block.text, selection, url, image);
            block.text = result.text;
            self.move_focus(index, result.selection);
        } else {
            let text = formatting::insert_link("", (0, 0), url, image).text;
            let containers = self.blocks[index].containers.clone();
            let end = text.len();
            let at = self.insert_after(index, Block::new(BlockKind::Paragraph, text, containers));
            self.move_focus(at, (end, end));
        }
        true
    }
}

impl RichEditor for RichDocument {
    fn get_markdown(&self) -> String {
        serialize(&self.blocks)
    }

    fn set_markdown(&mut self, markdown: &str) {
        self.blocks = parse_blocks(markdown);
        self.loaded = Some(markdown.to_string());
        self.focus = None;
        self.focus_requested = false;
        debug!("Loaded {} blocks", self.blocks.len());
    }

    fn is_active(&self, mark: Mark) -> bool {
        let Some(focus) = self.focus else {
            return false;
        };
        let Some(block) = self.blocks.get(focus.block) else {
            return false;
        };

        let inline = || {
            if block.kind.has_inline_text() {
                formatting::detect_inline_state(&block.text, focus.selection.1)
            } else {
                formatting::InlineState::default()
            }
        };

        match mark {
            Mark::Bold => inline().bold,
            Mark::Italic => inline().italic,
            Mark::Strikethrough => inline().strikethrough,
            Mark::Code => inline().code,
            Mark::Link => inline().link,
            Mark::Heading(level) => block.kind == BlockKind::Heading(level),
            Mark::BulletList => matches!(
                block.kind,
                BlockKind::ListItem {
                    marker: ListMarker::Bullet(_),
                    task: None
                }
            ),
            Mark::OrderedList => matches!(
                block.kind,
                BlockKind::ListItem {
                    marker: ListMarker::Ordered { .. },
                    ..
                }
            ),
            Mark::TaskList => matches!(block.kind, BlockKind::ListItem { task: Some(_), .. }),
            Mark::Blockquote => block.containers.contains(&Container::Quote),
            Mark::CodeBlock => matches!(block.kind, BlockKind::CodeBlock { .. }),
            Mark::Table => block.kind == BlockKind::Table,
            Mark::HorizontalRule | Mark::Image => false,
        }
    }

    /// HTML of the loaded markdown, or of the serialized blocks once edited.
    fn get_html(&self) -> String {
        match &self.loaded {
            Some(markdown) => render_to_html(markdown),
            None => render_to_html(&self.get_markdown()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rich::ROUND_TRIP_SAMPLES;
    use crate::sync::INITIAL_DOCUMENT;

    fn kinds(doc: &RichDocument) -> Vec<BlockKind> {
        doc.blocks().iter().map(|b| b.kind.clone()).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Round Trip Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_initial_document_structure_survives_round_trip() {
        let first = parse_blocks(INITIAL_DOCUMENT);
        let second = parse_blocks(&serialize(&first));
        assert_eq!(first, second);
    }

    #[test]
    fn test_initial_document_serializes_verbatim() {
        let doc = RichDocument::from_markdown(INITIAL_DOCUMENT);
        assert_eq!(doc.get_markdown(), INITIAL_DOCUMENT.trim_end());
    }

    #[test]
    fn test_heading_title() {
        let doc = RichDocument::from_markdown("## Title");
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].kind, BlockKind::Heading(HeadingLevel::H2));
        assert_eq!(doc.blocks()[0].text, "Title");
        assert_eq!(doc.get_markdown(), "## Title");
    }

    #[test]
    fn test_heading_closing_hashes_and_setext() {
        let doc = RichDocument::from_markdown("# Title ##\n\nSub\n---");
        assert_eq!(doc.blocks()[0].text, "Title");
        assert_eq!(doc.blocks()[1].kind, BlockKind::Heading(HeadingLevel::H2));
        assert_eq!(doc.get_markdown(), "# Title\n\n## Sub");
    }

    #[test]
    fn test_setext_heading_followed_by_paragraph() {
        let doc = RichDocument::from_markdown("Title\n=====\n\nBody");
        assert_eq!(
            kinds(&doc),
            vec![BlockKind::Heading(HeadingLevel::H1), BlockKind::Paragraph]
        );
        assert_eq!(doc.blocks()[0].text, "Title");
        assert_eq!(doc.get_markdown(), "# Title\n\nBody");

        let doc = RichDocument::from_markdown("Line one\nline two\n---\n\nAfter");
        assert_eq!(doc.blocks()[0].text, "Line one line two");
    }

    #[test]
    fn test_reference_definitions_are_kept() {
        let markdown = "See [docs][ref].\n\n[ref]: https://example.com";
        let mut doc = RichDocument::from_markdown(markdown);
        assert_eq!(kinds(&doc), vec![BlockKind::Paragraph, BlockKind::Raw]);
        assert_eq!(doc.get_markdown(), markdown);

        assert!(doc.set_block_text(0, "Read [docs][ref]."));
        assert_eq!(
            doc.get_markdown(),
            "Read [docs][ref].\n\n[ref]: https://example.com"
        );
        assert!(doc
            .get_html()
            .contains(r#"Read <a href="https://example.com">docs</a>."#));
    }

    #[test]
    fn test_reference_definitions_in_containers() {
        for markdown in [
            "> See [a][r]\n>\n> [r]: /u",
            "- item with [link][x]\n\n  [x]: /x",
            "- [r]: /u\n- [See][r]",
        ] {
            let doc = RichDocument::from_markdown(markdown);
            assert_eq!(doc.get_markdown(), markdown);
        }
    }

    #[test]
    fn test_get_html_renders_loaded_markdown() {
        let markdown = "Line one\nline two\n---";
        let doc = RichDocument::from_markdown(markdown);
        assert_eq!(doc.get_html(), render_to_html(markdown));
        assert!(doc.get_html().contains("Line one\nline two"));
    }

    #[test]
    fn test_rendering_survives_block_round_trip() {
        for markdown in ROUND_TRIP_SAMPLES.iter().copied().chain([INITIAL_DOCUMENT]) {
            let serialized = serialize(&parse_blocks(markdown));
            assert_eq!(
                render_to_html(&serialized),
                render_to_html(markdown),
                "{:?} serialized as {:?}",
                markdown,
                serialized
            );
        }
    }

    #[test]
    fn test_tight_and_loose_lists() {
        let tight = "- a\n- b";
        assert_eq!(RichDocument::from_markdown(tight).get_markdown(), tight);

        let loose = "- a\n\n- b";
        assert_eq!(RichDocument::from_markdown(loose).get_markdown(), loose);
    }

    #[test]
    fn test_nested_list_containers() {
        let doc = RichDocument::from_markdown("- a\n  - b\n- c");
        let blocks = doc.blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].containers, vec![Container::Indent(2)]);
        assert!(blocks[1].tight_with_prev);
        assert!(blocks[2].tight_with_prev);
        assert_eq!(doc.get_markdown(), "- a\n  - b\n- c");
    }

    #[test]
    fn test_loose_inner_list_keeps_blank_lines() {
        let source = "- a\n  - b\n\n  - c";
        let first = parse_blocks(source);
        let second = parse_blocks(&serialize(&first));
        assert_eq!(first, second);
        assert!(!first[2].tight_with_prev);
    }

    #[test]
    fn test_ordered_list_numbers() {
        let doc = RichDocument::from_markdown("3. x\n4. y");
        assert_eq!(
            doc.blocks()[1].kind,
            BlockKind::ListItem {
                marker: ListMarker::Ordered {
                    number: 4,
                    delimiter: '.'
                },
                task: None
            }
        );
        assert_eq!(doc.get_markdown(), "3. x\n4. y");
    }

    #[test]
    fn test_task_items() {
        let doc = RichDocument::from_markdown("- [x] done\n- [ ] todo");
        assert_eq!(
            doc.blocks()[0].kind,
            BlockKind::ListItem {
                marker: ListMarker::Bullet('-'),
                task: Some(true)
            }
        );
        assert_eq!(doc.blocks()[0].text, "done");
        assert_eq!(doc.blocks()[1].text, "todo");
    }

    #[test]
    fn test_blockquote_paragraphs() {
        let source = "> a\n>\n> b";
        let doc = RichDocument::from_markdown(source);
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.blocks()[1].quote_depth(), 1);
        assert_eq!(doc.get_markdown(), source);
    }

    #[test]
    fn test_code_block_with_backticks() {
        let source = "````md\n```\ninner\n```\n````";
        let doc = RichDocument::from_markdown(source);
        assert_eq!(
            doc.blocks()[0].kind,
            BlockKind::CodeBlock {
                info: "md".to_string()
            }
        );
        assert_eq!(doc.get_markdown(), source);
    }

    #[test]
    fn test_table_block() {
        let source = "| A | B |\n| --- | --- |\n| 1 | 2 |";
        let doc = RichDocument::from_markdown(source);
        assert_eq!(kinds(&doc), vec![BlockKind::Table]);
        assert_eq!(doc.get_markdown(), source);
    }

    #[test]
    fn test_empty_document() {
        let doc = RichDocument::from_markdown("");
        assert!(doc.blocks().is_empty());
        assert_eq!(doc.get_markdown(), "");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_set_block_text() {
        let mut doc = RichDocument::from_markdown("hello");
        assert!(doc.set_block_text(0, "hello **world**"));
        assert!(!doc.set_block_text(0, "hello **world**"));
        assert_eq!(doc.get_markdown(), "hello **world**");
    }

    #[test]
    fn test_blank_line_splits_paragraph() {
        let mut doc = RichDocument::from_markdown("one");
        doc.set_block_text(0, "one\n\ntwo");
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.get_markdown(), "one\n\ntwo");
        assert_eq!(doc.take_focus_request().map(|f| f.block), Some(1));
    }

    #[test]
    fn test_blank_line_in_list_item_adds_item() {
        let mut doc = RichDocument::from_markdown("1. a\n2. b");
        doc.set_block_text(1, "b\n\n");
        assert_eq!(doc.blocks().len(), 3);
        assert_eq!(doc.get_markdown(), "1. a\n2. b\n3. ");
    }

    #[test]
    fn test_read_only_ignores_edits() {
        let mut doc = RichDocument::read_only();
        doc.set_markdown("text");
        assert!(!doc.set_block_text(0, "changed"));
        assert!(!doc.apply(&FormatCommand::Bold));
        assert_eq!(doc.get_markdown(), "text");
    }

    #[test]
    fn test_toggle_task() {
        let mut doc = RichDocument::from_markdown("- [ ] todo");
        assert!(doc.toggle_task(0));
        assert_eq!(doc.get_markdown(), "- [x] todo");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Command Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_command_on_selection() {
        let mut doc = RichDocument::from_markdown("make this bold");
        doc.set_focus(0, (10, 14));
        assert!(doc.apply(&FormatCommand::Bold));
        assert_eq!(doc.get_markdown(), "make this **bold**");
        assert!(doc.is_active(Mark::Bold));
    }

    #[test]
    fn test_heading_command_toggles() {
        let mut doc = RichDocument::from_markdown("Title");
        doc.set_focus(0, (0, 0));
        doc.apply(&FormatCommand::Heading(HeadingLevel::H2));
        assert_eq!(doc.get_markdown(), "## Title");
        assert!(doc.is_active(Mark::Heading(HeadingLevel::H2)));
        assert!(!doc.is_active(Mark::Heading(HeadingLevel::H1)));

        doc.apply(&FormatCommand::Heading(HeadingLevel::H2));
        assert_eq!(doc.get_markdown(), "Title");
    }

    #[test]
    fn test_list_commands_join_existing_list() {
        let mut doc = RichDocument::from_markdown("1. a\n\nb");
        doc.set_focus(1, (0, 0));
        doc.apply(&FormatCommand::OrderedList);
        assert_eq!(doc.get_markdown(), "1. a\n2. b");
        assert!(doc.is_active(Mark::OrderedList));

        doc.apply(&FormatCommand::OrderedList);
        assert_eq!(doc.get_markdown(), "1. a\n\nb");
    }

    #[test]
    fn test_task_list_command() {
        let mut doc = RichDocument::from_markdown("buy milk");
        doc.set_focus(0, (0, 0));
        doc.apply(&FormatCommand::TaskList);
        assert_eq!(doc.get_markdown(), "- [ ] buy milk");
        assert!(doc.is_active(Mark::TaskList));
        assert!(!doc.is_active(Mark::BulletList));
    }

    #[test]
    fn test_blockquote_command() {
        let mut doc = RichDocument::from_markdown("quote me");
        doc.set_focus(0, (0, 0));
        doc.apply(&FormatCommand::Blockquote);
        assert_eq!(doc.get_markdown(), "> quote me");
        assert!(doc.is_active(Mark::Blockquote));
    }

    #[test]
    fn test_code_block_command() {
        let mut doc = RichDocument::from_markdown("let x = 1;");
        doc.set_focus(0, (0, 0));
        doc.apply(&FormatCommand::CodeBlock);
        assert_eq!(doc.get_markdown(), "```\nlet x = 1;\n```");
        assert!(doc.is_active(Mark::CodeBlock));
    }

    #[test]
    fn test_rule_command_appends_paragraph() {
        let mut doc = RichDocument::from_markdown("above");
        doc.set_focus(0, (5, 5));
        doc.apply(&FormatCommand::HorizontalRule);
        assert_eq!(
            kinds(&doc),
            vec![BlockKind::Paragraph, BlockKind::Rule, BlockKind::Paragraph]
        );
        assert_eq!(doc.focus().map(|f| f.block), Some(2));
    }

    #[test]
    fn test_link_command() {
        let mut doc = RichDocument::from_markdown("see docs");
        doc.set_focus(0, (4, 8));
        assert!(doc.apply(&FormatCommand::Link("https://x.dev".into())));
        assert_eq!(doc.get_markdown(), "see [docs](https://x.dev)");

        assert!(!doc.apply(&FormatCommand::Link("   ".into())));
    }

    #[test]
    fn test_image_command_without_focus_appends() {
        let mut doc = RichDocument::new();
        doc.apply(&FormatCommand::Image("cat.png".into()));
        assert_eq!(doc.get_markdown(), "![](cat.png)");
    }

    #[test]
    fn test_table_command_inserts_parseable_table() {
        let mut doc = RichDocument::from_markdown("intro");
        doc.set_focus(0, (0, 0));
        doc.apply(&FormatCommand::Table);
        let reparsed = parse_blocks(&doc.get_markdown());
        assert_eq!(reparsed[1].kind, BlockKind::Table);
        assert!(doc.get_html().contains("<table>"));
    }

    #[test]
    fn test_is_active_without_focus() {
        let doc = RichDocument::from_markdown("**bold**");
        assert!(!doc.is_active(Mark::Bold));
    }

    #[test]
    fn test_split_paragraphs() {
        assert_eq!(split_paragraphs("a"), vec!["a"]);
        assert_eq!(split_paragraphs("a\nb"), vec!["a\nb"]);
        assert_eq!(split_paragraphs("a\n\nb"), vec!["a", "b"]);
        assert_eq!(split_paragraphs("a\n\n"), vec!["a", ""]);
        assert_eq!(split_paragraphs("a\n"), vec!["a\n"]);
    }
}
