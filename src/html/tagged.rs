//! Tagged tree nodes and their HTML serialization
//!
//! The tokenizer (see `markdown::syntax`) produces a tree of text and element
//! nodes where elements carry a list of class names. `render` walks that tree
//! and turns it back into HTML, wrapping classed elements in `<span>` tags so
//! the highlighted markup can be embedded as literal text.

use super::escape::escape_html;

// ─────────────────────────────────────────────────────────────────────────────
// TaggedNode
// ─────────────────────────────────────────────────────────────────────────────

/// A node of the tokenizer's output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedNode {
    /// Raw text
    Text { value: String },
    /// Element with an ordered list of class names
    Element {
        class_names: Vec<String>,
        children: Vec<TaggedNode>,
    },
    /// Any other node kind; only its children are meaningful
    Other { children: Vec<TaggedNode> },
}

impl TaggedNode {
    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        TaggedNode::Text {
            value: value.into(),
        }
    }

    /// Create an element node from class names and children.
    pub fn element<I, S>(class_names: I, children: Vec<TaggedNode>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TaggedNode::Element {
            class_names: class_names.into_iter().map(Into::into).collect(),
            children,
        }
    }

    /// Create an unclassed root element.
    pub fn root(children: Vec<TaggedNode>) -> Self {
        TaggedNode::Element {
            class_names: Vec::new(),
            children,
        }
    }

    /// Children of this node (empty for text nodes).
    pub fn children(&self) -> &[TaggedNode] {
        match self {
            TaggedNode::Text { .. } => &[],
            TaggedNode::Element { children, .. } | TaggedNode::Other { children } => children,
        }
    }

    /// Concatenated text of this node and its descendants, without markup.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            TaggedNode::Text { value } => out.push_str(value),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a tagged tree to HTML.
///
/// - text nodes are escaped
/// - classed elements become `<span class="a b">...</span>`
/// - unclassed elements and other nodes contribute their children only
pub fn render(node: &TaggedNode) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_into(node: &TaggedNode, out: &mut String) {
    match node {
        TaggedNode::Text { value } => out.push_str(&escape_html(value)),
        TaggedNode::Element {
            class_names,
            children,
        } if !class_names.is_empty() => {
            out.push_str("<span class=\"");
            out.push_str(&class_names.join(" "));
            out.push_str("\">");
            for child in children {
                render_into(child, out);
            }
            out.push_str("</span>");
        }
        TaggedNode::Element { children, .. } | TaggedNode::Other { children } => {
            for child in children {
                render_into(child, out);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_is_escaped() {
        let node = TaggedNode::text("<b>");
        assert_eq!(render(&node), "&lt;b&gt;");
    }

    #[test]
    fn test_render_classed_element() {
        let node = TaggedNode::element(["a", "b"], vec![TaggedNode::text("x")]);
        assert_eq!(render(&node), "<span class=\"a b\">x</span>");
    }

    #[test]
    fn test_render_unclassed_element_unwrapped() {
        let node = TaggedNode::root(vec![TaggedNode::text("a"), TaggedNode::text("b")]);
        assert_eq!(render(&node), "ab");
    }

    #[test]
    fn test_render_other_node_children() {
        let node = TaggedNode::Other {
            children: vec![TaggedNode::element(["k"], vec![TaggedNode::text("fn")])],
        };
        assert_eq!(render(&node), "<span class=\"k\">fn</span>");
    }

    #[test]
    fn test_render_empty_other_node() {
        let node = TaggedNode::Other {
            children: Vec::new(),
        };
        assert_eq!(render(&node), "");
    }

    #[test]
    fn test_render_nested_tree() {
        let tree = TaggedNode::root(vec![
            TaggedNode::element(
                ["meta", "tag"],
                vec![
                    TaggedNode::element(["punctuation"], vec![TaggedNode::text("<")]),
                    TaggedNode::element(["entity", "name"], vec![TaggedNode::text("p")]),
                    TaggedNode::element(["punctuation"], vec![TaggedNode::text(">")]),
                ],
            ),
            TaggedNode::text("a & b"),
        ]);

        assert_eq!(
            render(&tree),
            "<span class=\"meta tag\"><span class=\"punctuation\">&lt;</span>\
             <span class=\"entity name\">p</span>\
             <span class=\"punctuation\">&gt;</span></span>a &amp; b"
        );
    }

    #[test]
    fn test_text_content_ignores_markup() {
        let tree = TaggedNode::root(vec![
            TaggedNode::element(["x"], vec![TaggedNode::text("<p>")]),
            TaggedNode::text("hi"),
        ]);
        assert_eq!(tree.text_content(), "<p>hi");
    }
}
