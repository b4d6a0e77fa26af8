//! HTML escaping for raw text nodes.

/// Escape the four HTML metacharacters `&`, `<`, `>` and `"`.
///
/// The ampersand is replaced first so the entities introduced by the later
/// substitutions are not escaped a second time. Escaping an already escaped
/// string escapes its `&` again (`&lt;` becomes `&amp;lt;`).
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_html("Hello"), "Hello");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_each_metacharacter() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_escape_leaves_single_quote() {
        assert_eq!(escape_html("it's"), "it's");
    }

    #[test]
    fn test_escape_output_has_no_raw_metacharacters() {
        let escaped = escape_html(r#"<a href="x">&amp; "y" </a>"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert!(!escaped.contains('"'));

        // Every remaining ampersand starts one of the entities we produce
        for (idx, _) in escaped.match_indices('&') {
            let rest = &escaped[idx..];
            assert!(
                rest.starts_with("&amp;")
                    || rest.starts_with("&lt;")
                    || rest.starts_with("&gt;")
                    || rest.starts_with("&quot;"),
                "unexpected entity at {}: {}",
                idx,
                rest
            );
        }
    }

    #[test]
    fn test_escape_twice_double_escapes_ampersand() {
        let once = escape_html("<b>");
        assert_eq!(once, "&lt;b&gt;");
        assert_eq!(escape_html(&once), "&amp;lt;b&amp;gt;");
    }

    #[test]
    fn test_escape_unicode() {
        assert_eq!(escape_html("Blåbær <ø>"), "Blåbær &lt;ø&gt;");
    }
}
