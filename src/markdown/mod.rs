//! Markdown parsing, rendering and inline formatting
//!
//! This module wraps the comrak library, a CommonMark + GFM compatible
//! parser, and syntect for tokenizing source text.
//!
//! # Features
//! - Parse markdown text to an owned AST with source positions
//! - Render markdown to HTML
//! - Inline delimiter toggling and styled spans for the WYSIWYG surface
//! - Scope-tagged tokenizing via syntect
//!
//! # Example
//! ```ignore
//! use crate::markdown::{parse_markdown, render_to_html};
//!
//! let doc = parse_markdown("# Hello\n\nThis is **bold** text.");
//! let html = render_to_html("# Hello");
//! ```

pub mod formatting;
mod parser;
pub mod syntax;

pub use formatting::{link_at, style_spans};
pub use parser::{
    parse_markdown, render_to_html, HeadingLevel, ListType, MarkdownNode, MarkdownNodeType,
};
pub use syntax::{get_tokenizer, Tokenizer};
