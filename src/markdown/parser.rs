//! Markdown parsing and HTML rendering using comrak
//!
//! comrak's arena-allocated AST is converted into an owned `MarkdownNode`
//! tree so the rich document can keep it around without borrowing the arena.
//! Source positions are preserved because block text is sliced from the
//! original markdown.

use comrak::{
    markdown_to_html,
    nodes::{
        AstNode, ListDelimType, ListType as ComrakListType, NodeValue,
        TableAlignment as ComrakTableAlignment,
    },
    parse_document, Arena, Options,
};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown dialect used by every view of the document.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// GitHub Flavored Markdown tables
    pub tables: bool,
    /// `~~strikethrough~~`
    pub strikethrough: bool,
    /// Bare URLs become links
    pub autolink: bool,
    /// `- [ ]` and `- [x]` items
    pub tasklist: bool,
    /// Front matter delimiter, if front matter is recognised
    pub front_matter_delimiter: Option<String>,
    /// Strip raw HTML and dangerous URLs from rendered output
    pub safe_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            front_matter_delimiter: Some("---".to_string()),
            safe_html: true,
        }
    }
}

impl MarkdownOptions {
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.front_matter_delimiter = self.front_matter_delimiter.clone();

        options.render.unsafe_ = !self.safe_html;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node Types
// ─────────────────────────────────────────────────────────────────────────────

/// Heading level (H1-H6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
    H4 = 4,
    H5 = 5,
    H6 = 6,
}

impl From<u8> for HeadingLevel {
    fn from(level: u8) -> Self {
        match level {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            3 => HeadingLevel::H3,
            4 => HeadingLevel::H4,
            5 => HeadingLevel::H5,
            _ => HeadingLevel::H6,
        }
    }
}

/// List marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet { marker: char },
    Ordered { start: u32, delimiter: char },
}

/// Table column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<ComrakTableAlignment> for TableAlignment {
    fn from(align: ComrakTableAlignment) -> Self {
        match align {
            ComrakTableAlignment::None => TableAlignment::None,
            ComrakTableAlignment::Left => TableAlignment::Left,
            ComrakTableAlignment::Center => TableAlignment::Center,
            ComrakTableAlignment::Right => TableAlignment::Right,
        }
    }
}

/// Kind of a node in the owned AST.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownNodeType {
    Document,
    BlockQuote,
    List { list_type: ListType, tight: bool },
    Item,
    /// List item carrying a task checkbox
    TaskItem { checked: bool },
    CodeBlock { info: String, literal: String },
    HtmlBlock(String),
    Paragraph,
    Heading { level: HeadingLevel, setext: bool },
    ThematicBreak,
    Table { alignments: Vec<TableAlignment> },
    TableRow { header: bool },
    TableCell,
    FrontMatter(String),
    Text(String),
    Code(String),
    HtmlInline(String),
    SoftBreak,
    LineBreak,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String },
    Image { url: String, title: String },
    /// Node kinds the editor does not model (footnotes, description lists, ...)
    Other,
}

/// A node of the owned AST with its source span.
#[derive(Debug, Clone)]
pub struct MarkdownNode {
    pub node_type: MarkdownNodeType,
    pub children: Vec<MarkdownNode>,
    /// First source line (1-indexed)
    pub start_line: usize,
    /// Byte column of the first character on `start_line` (1-indexed)
    pub start_column: usize,
    /// Last source line (1-indexed)
    pub end_line: usize,
    /// Byte column of the last character on `end_line` (1-indexed, inclusive)
    pub end_column: usize,
}

impl MarkdownNode {
    /// All text content of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, output: &mut String) {
        match &self.node_type {
            MarkdownNodeType::Text(t) | MarkdownNodeType::Code(t) => output.push_str(t),
            MarkdownNodeType::SoftBreak => output.push(' '),
            MarkdownNodeType::LineBreak => output.push('\n'),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(output);
        }
    }
}

/// A parsed document: the AST root plus the source it was parsed from.
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    pub root: MarkdownNode,
    pub source: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown with the default dialect.
///
/// comrak accepts any input, so parsing never fails.
pub fn parse_markdown(markdown: &str) -> MarkdownDocument {
    parse_markdown_with_options(markdown, &MarkdownOptions::default())
}

/// Parse markdown with a custom dialect.
pub fn parse_markdown_with_options(markdown: &str, options: &MarkdownOptions) -> MarkdownDocument {
    let arena = Arena::new();
    let mut comrak_options = options.to_comrak_options();
    // Keeps inline positions right for spans that cross a line break
    comrak_options.render.sourcepos = true;
    let root = parse_document(&arena, markdown, &comrak_options);

    MarkdownDocument {
        root: convert_node(root),
        source: markdown.to_string(),
    }
}

/// Render markdown to an HTML fragment with the default dialect.
pub fn render_to_html(markdown: &str) -> String {
    markdown_to_html(markdown, &MarkdownOptions::default().to_comrak_options())
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion
// ─────────────────────────────────────────────────────────────────────────────

fn convert_node<'a>(node: &'a AstNode<'a>) -> MarkdownNode {
    let ast = node.data.borrow();
    let sourcepos = ast.sourcepos;

    MarkdownNode {
        node_type: convert_node_value(&ast.value),
        children: node.children().map(convert_node).collect(),
        start_line: sourcepos.start.line,
        start_column: sourcepos.start.column,
        end_line: sourcepos.end.line,
        end_column: sourcepos.end.column,
    }
}

fn convert_node_value(value: &NodeValue) -> MarkdownNodeType {
    match value {
        NodeValue::Document => MarkdownNodeType::Document,
        NodeValue::BlockQuote => MarkdownNodeType::BlockQuote,
        NodeValue::List(list) => {
            let list_type = match list.list_type {
                ComrakListType::Bullet => ListType::Bullet {
                    marker: list.bullet_char as char,
                },
                ComrakListType::Ordered => ListType::Ordered {
                    start: list.start as u32,
                    delimiter: if list.delimiter == ListDelimType::Paren {
                        ')'
                    } else {
                        '.'
                    },
                },
            };
            MarkdownNodeType::List {
                list_type,
                tight: list.tight,
            }
        }
        NodeValue::Item(_) => MarkdownNodeType::Item,
        NodeValue::TaskItem(checked) => MarkdownNodeType::TaskItem {
            checked: checked.map(|c| c == 'x' || c == 'X').unwrap_or(false),
        },
        NodeValue::CodeBlock(code) => MarkdownNodeType::CodeBlock {
            info: code.info.clone(),
            literal: code.literal.clone(),
        },
        NodeValue::HtmlBlock(html) => MarkdownNodeType::HtmlBlock(html.literal.clone()),
        NodeValue::Paragraph => MarkdownNodeType::Paragraph,
        NodeValue::Heading(heading) => MarkdownNodeType::Heading {
            level: HeadingLevel::from(heading.level),
            setext: heading.setext,
        },
        NodeValue::ThematicBreak => MarkdownNodeType::ThematicBreak,
        NodeValue::Table(table) => MarkdownNodeType::Table {
            alignments: table
                .alignments
                .iter()
                .map(|a| TableAlignment::from(*a))
                .collect(),
        },
        NodeValue::TableRow(header) => MarkdownNodeType::TableRow { header: *header },
        NodeValue::TableCell => MarkdownNodeType::TableCell,
        NodeValue::FrontMatter(fm) => MarkdownNodeType::FrontMatter(fm.clone()),
        NodeValue::Text(text) => MarkdownNodeType::Text(text.clone()),
        NodeValue::Code(code) => MarkdownNodeType::Code(code.literal.clone()),
        NodeValue::HtmlInline(html) => MarkdownNodeType::HtmlInline(html.clone()),
        NodeValue::SoftBreak => MarkdownNodeType::SoftBreak,
        NodeValue::LineBreak => MarkdownNodeType::LineBreak,
        NodeValue::Emph => MarkdownNodeType::Emphasis,
        NodeValue::Strong => MarkdownNodeType::Strong,
        NodeValue::Strikethrough => MarkdownNodeType::Strikethrough,
        NodeValue::Link(link) => MarkdownNodeType::Link {
            url: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::Image(image) => MarkdownNodeType::Image {
            url: image.url.clone(),
            title: image.title.clone(),
        },
        _ => MarkdownNodeType::Other,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_document() {
        let doc = parse_markdown("");
        assert!(doc.root.children.is_empty());
        assert!(matches!(doc.root.node_type, MarkdownNodeType::Document));
    }

    #[test]
    fn test_parse_heading_level() {
        let doc = parse_markdown("## Title");
        match &doc.root.children[0].node_type {
            MarkdownNodeType::Heading { level, setext } => {
                assert_eq!(*level, HeadingLevel::H2);
                assert!(!setext);
            }
            other => panic!("Expected heading, got {:?}", other),
        }
        assert_eq!(doc.root.children[0].text_content(), "Title");
    }

    #[test]
    fn test_parse_bullet_marker() {
        let doc = parse_markdown("* one\n* two");
        match &doc.root.children[0].node_type {
            MarkdownNodeType::List { list_type, tight } => {
                assert_eq!(*list_type, ListType::Bullet { marker: '*' });
                assert!(tight);
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ordered_list_start() {
        let doc = parse_markdown("3) three\n4) four");
        match &doc.root.children[0].node_type {
            MarkdownNodeType::List { list_type, .. } => {
                assert_eq!(
                    *list_type,
                    ListType::Ordered {
                        start: 3,
                        delimiter: ')'
                    }
                );
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_task_items() {
        let doc = parse_markdown("- [x] done\n- [ ] todo");
        let list = &doc.root.children[0];
        assert_eq!(list.children.len(), 2);
        assert!(matches!(
            list.children[0].node_type,
            MarkdownNodeType::TaskItem { checked: true }
        ));
        assert!(matches!(
            list.children[1].node_type,
            MarkdownNodeType::TaskItem { checked: false }
        ));
    }

    #[test]
    fn test_parse_strong_inside_paragraph() {
        let doc = parse_markdown("This is **bold** text");
        let para = &doc.root.children[0];
        let strong = para
            .children
            .iter()
            .find(|c| matches!(c.node_type, MarkdownNodeType::Strong))
            .expect("paragraph should contain a Strong node");
        assert_eq!(strong.text_content(), "bold");
    }

    #[test]
    fn test_inline_source_positions() {
        let doc = parse_markdown("a **b** c");
        let strong = doc.root.children[0]
            .children
            .iter()
            .find(|c| matches!(c.node_type, MarkdownNodeType::Strong))
            .expect("paragraph should contain a Strong node");
        assert_eq!((strong.start_line, strong.start_column), (1, 3));
        assert_eq!((strong.end_line, strong.end_column), (1, 7));
    }

    #[test]
    fn test_parse_code_block_info() {
        let doc = parse_markdown("```rust\nfn main() {}\n```\n");
        match &doc.root.children[0].node_type {
            MarkdownNodeType::CodeBlock { info, literal } => {
                assert_eq!(info, "rust");
                assert_eq!(literal, "fn main() {}\n");
            }
            other => panic!("Expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_table_alignment() {
        let markdown = "| L | C | R |\n|:--|:-:|--:|\n| 1 | 2 | 3 |";
        let doc = parse_markdown(markdown);
        match &doc.root.children[0].node_type {
            MarkdownNodeType::Table { alignments } => {
                assert_eq!(
                    alignments,
                    &vec![
                        TableAlignment::Left,
                        TableAlignment::Center,
                        TableAlignment::Right
                    ]
                );
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_source_positions() {
        let doc = parse_markdown("# Heading\n\n- item");
        let heading = &doc.root.children[0];
        assert_eq!(heading.start_line, 1);
        assert_eq!(heading.start_column, 1);

        let item = &doc.root.children[1].children[0];
        let para = &item.children[0];
        assert_eq!(para.start_line, 3);
        assert_eq!(para.start_column, 3);
    }

    #[test]
    fn test_parse_malformed_markdown_does_not_panic() {
        let inputs = [
            "# Unclosed heading",
            "```\nunclosed code block",
            "| broken | table",
            "[unclosed link(",
            "![broken image",
            "***nested emphasis**",
        ];
        for input in inputs {
            let doc = parse_markdown(input);
            assert_eq!(doc.source, input);
        }
    }

    #[test]
    fn test_render_to_html() {
        let html = render_to_html("# Hello\n\nWorld **bold**");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<p>World <strong>bold</strong></p>"));
    }

    #[test]
    fn test_render_strips_raw_html() {
        let html = render_to_html("<script>alert(1)</script>\n\ntext");
        assert!(!html.contains("<script>"));
        assert!(html.contains("text"));
    }
}
