//! HTML pretty-printer
//!
//! Reformats an HTML string into one logical unit per line with two-space
//! indentation per nesting level. Block-level tags are detected with a regex
//! and moved onto their own lines; everything between them stays together.
//!
//! This is a cosmetic formatter, not a validating parser. Unbalanced or
//! unusual markup is still formatted, just with imperfect indentation.

use regex::Regex;
use std::sync::OnceLock;

/// Block-level tags that always start on their own line.
const BLOCK_TAGS: &[&str] = &[
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "blockquote",
    "pre",
    "table",
    "thead",
    "tbody",
    "tr",
    "th",
    "td",
    "hr",
    "br",
    "section",
    "article",
    "header",
    "footer",
    "nav",
    "figure",
    "figcaption",
];

/// Elements that never contain children and so never open a nesting level.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// Spaces per indentation level.
const INDENT_WIDTH: usize = 2;

fn block_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)(</?(?:{})(?:\s[^>]*)?/?>)", BLOCK_TAGS.join("|"));
        Regex::new(&pattern).expect("block tag pattern is valid")
    })
}

fn closing_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^</[^>]+>$").expect("closing tag pattern is valid"))
}

fn opening_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^<([a-zA-Z][a-zA-Z0-9-]*)[^>]*>$").expect("opening tag pattern is valid")
    })
}

/// Format HTML with one block tag or text run per line.
///
/// # Example
/// ```ignore
/// assert_eq!(
///     pretty_print("<div><p>hi</p></div>"),
///     "<div>\n  <p>\n    hi\n  </p>\n</div>"
/// );
/// ```
pub fn pretty_print(html: &str) -> String {
    let separated = block_tag_regex().replace_all(html, "\n$1\n");

    let mut indent: usize = 0;
    let mut lines = Vec::new();

    for fragment in separated.split('\n') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        if closing_tag_regex().is_match(fragment) {
            indent = indent.saturating_sub(1);
            lines.push(indented(fragment, indent));
            continue;
        }

        lines.push(indented(fragment, indent));

        if opens_level(fragment) {
            indent += 1;
        }
    }

    lines.join("\n")
}

/// Whether a fragment is an opening tag that nests the following fragments.
fn opens_level(fragment: &str) -> bool {
    let Some(captures) = opening_tag_regex().captures(fragment) else {
        return false;
    };
    if fragment.ends_with("/>") {
        return false;
    }
    let name = captures[1].to_ascii_lowercase();
    !VOID_TAGS.contains(&name.as_str())
}

fn indented(fragment: &str, level: usize) -> String {
    format!("{}{}", " ".repeat(level * INDENT_WIDTH), fragment)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            pretty_print("<div><p>hi</p></div>"),
            "<div>\n  <p>\n    hi\n  </p>\n</div>"
        );
    }

    #[test]
    fn test_void_tag_does_not_indent() {
        let output = pretty_print("<p>a</p><hr><p>b</p>");
        assert_eq!(output, "<p>\n  a\n</p>\n<hr>\n<p>\n  b\n</p>");
    }

    #[test]
    fn test_self_closing_tag_does_not_indent() {
        let output = pretty_print("<div><br/><span>x</span></div>");
        assert_eq!(output, "<div>\n  <br/>\n  <span>x</span>\n</div>");
    }

    #[test]
    fn test_case_insensitive_tags_with_attributes() {
        let output = pretty_print("<DIV class=\"a\"><P id='x'>t</P></DIV>");
        assert_eq!(
            output,
            "<DIV class=\"a\">\n  <P id='x'>\n    t\n  </P>\n</DIV>"
        );
    }

    #[test]
    fn test_inline_markup_stays_on_one_line() {
        let output = pretty_print("<p>This is <strong>bold</strong> text</p>");
        assert_eq!(output, "<p>\n  This is <strong>bold</strong> text\n</p>");
    }

    #[test]
    fn test_pre_is_not_confused_with_p() {
        let output = pretty_print("<pre><code>x</code></pre>");
        assert_eq!(output, "<pre>\n  <code>x</code>\n</pre>");
    }

    #[test]
    fn test_list_structure() {
        let output = pretty_print("<ul>\n<li>One</li>\n<li>Two</li>\n</ul>\n");
        assert_eq!(
            output,
            "<ul>\n  <li>\n    One\n  </li>\n  <li>\n    Two\n  </li>\n</ul>"
        );
    }

    #[test]
    fn test_unbalanced_closing_floors_at_zero() {
        let output = pretty_print("</div></div><p>x</p>");
        assert_eq!(output, "</div>\n</div>\n<p>\n  x\n</p>");
    }

    #[test]
    fn test_standalone_inline_void_element() {
        // `img` is not a block tag, but as a standalone fragment it is still
        // recognised as void and must not open a level.
        let output = pretty_print("<p><img src=\"a.png\"></p><p>b</p>");
        assert_eq!(output, "<p>\n  <img src=\"a.png\">\n</p>\n<p>\n  b\n</p>");
    }

    #[test]
    fn test_whitespace_only_fragments_dropped() {
        let output = pretty_print("  <div>   \n\n  </div>  ");
        assert_eq!(output, "<div>\n</div>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pretty_print(""), "");
    }

    #[test]
    fn test_table_nesting() {
        let html = "<table><thead><tr><th>A</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>";
        let output = pretty_print(html);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "<table>");
        assert_eq!(lines[1], "  <thead>");
        assert_eq!(lines[2], "    <tr>");
        assert_eq!(lines[3], "      <th>");
        assert_eq!(lines[4], "        A");
        assert_eq!(lines[5], "      </th>");
        assert_eq!(*lines.last().unwrap(), "</table>");
    }
}
