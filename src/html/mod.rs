//! HTML text utilities for the preview's HTML-source mode
//!
//! This module turns the compiled HTML of the document into something a human
//! can read inside the editor:
//!
//! - `escape.rs` - Escapes HTML metacharacters in raw text
//! - `pretty.rs` - Reformats single-line HTML into indented multi-line HTML
//! - `tagged.rs` - Tagged tree produced by the tokenizer, and its HTML serializer
//!
//! # Example
//! ```ignore
//! use crate::html::{pretty_print, render, TaggedNode};
//!
//! let formatted = pretty_print("<div><p>hi</p></div>");
//! let tree = TaggedNode::element(["tag"], vec![TaggedNode::text("<p>")]);
//! assert_eq!(render(&tree), "<span class=\"tag\">&lt;p&gt;</span>");
//! ```

mod escape;
mod pretty;
mod tagged;

pub use pretty::pretty_print;
pub use tagged::{render, TaggedNode};
