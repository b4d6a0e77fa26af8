//! Text statistics for the status bar
//!
//! Counts are taken over the rendered text of the document, not the markdown
//! source: `**bold**` counts as four characters and list markers do not
//! count at all.

use crate::markdown::{parse_markdown, MarkdownNode, MarkdownNodeType};

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Text statistics for a document.
///
/// # Example
///
/// ```ignore
/// let stats = TextStats::from_markdown("# Hello\n\nThis is **bold**.");
/// assert_eq!(stats.words, 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Number of words (sequences of non-whitespace characters)
    pub words: usize,
    /// Number of characters including whitespace
    pub characters: usize,
    /// Number of characters excluding whitespace
    pub characters_no_spaces: usize,
}

impl TextStats {
    /// Calculate statistics over plain text in a single pass.
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self::default();
        let mut in_word = false;

        for ch in text.chars() {
            stats.characters += 1;

            if ch.is_whitespace() {
                in_word = false;
            } else {
                stats.characters_no_spaces += 1;
                if !in_word {
                    in_word = true;
                    stats.words += 1;
                }
            }
        }

        stats
    }

    /// Calculate statistics over the text content of a markdown document.
    ///
    /// Blocks are counted separately, so words never run together across
    /// block boundaries and the boundaries themselves are not characters.
    pub fn from_markdown(markdown: &str) -> Self {
        let doc = parse_markdown(markdown);
        let mut blocks = Vec::new();
        collect_block_text(&doc.root, &mut blocks);

        blocks
            .iter()
            .map(|text| Self::from_text(text))
            .fold(Self::default(), |acc, s| Self {
                words: acc.words + s.words,
                characters: acc.characters + s.characters,
                characters_no_spaces: acc.characters_no_spaces + s.characters_no_spaces,
            })
    }

    /// Format the statistics for the status bar, e.g. "892 characters / 150 words".
    pub fn format_compact(&self) -> String {
        format!("{} characters / {} words", self.characters, self.words)
    }
}

fn collect_block_text(node: &MarkdownNode, out: &mut Vec<String>) {
    match &node.node_type {
        MarkdownNodeType::Paragraph
        | MarkdownNodeType::Heading { .. }
        | MarkdownNodeType::TableCell => out.push(node.text_content()),
        MarkdownNodeType::CodeBlock { literal, .. } => {
            out.push(literal.trim_end_matches('\n').to_string())
        }
        _ => {
            for child in &node.children {
                collect_block_text(child, out);
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
    fn test_stats_empty_text() {
        let stats = TextStats::from_text("");
        assert_eq!(stats, TextStats::default());
    }

    #[test]
    fn test_stats_simple_sentence() {
        let stats = TextStats::from_text("Hello, World!");
        assert_eq!(stats.words, 2);
        assert_eq!(stats.characters, 13);
        assert_eq!(stats.characters_no_spaces, 12);
    }

    #[test]
    fn test_stats_unicode() {
        // Chinese has no spaces, so "你好世界" is one word
        let stats = TextStats::from_text("Привет мир! 你好世界");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, 16);
        assert_eq!(stats.characters_no_spaces, 14);
    }

    #[test]
    fn test_stats_mixed_whitespace() {
        let stats = TextStats::from_text("word1  word2\t\tword3");
        assert_eq!(stats.words, 3);
    }

    #[test]
    fn test_markdown_syntax_not_counted() {
        let stats = TextStats::from_markdown("# Hi\n\nThis is **bold**.");
        assert_eq!(stats.words, 4);
        assert_eq!(stats.characters, "Hi".len() + "This is bold.".len());
    }

    #[test]
    fn test_list_items_do_not_merge() {
        let stats = TextStats::from_markdown("- one\n- two\n- three");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, 11);
    }

    #[test]
    fn test_code_block_counted() {
        let stats = TextStats::from_markdown("```\nlet x = 1;\n```");
        assert_eq!(stats.words, 4);
    }

    #[test]
    fn test_stats_format_compact() {
        let stats = TextStats {
            words: 150,
            characters: 892,
            characters_no_spaces: 743,
        };
        assert_eq!(stats.format_compact(), "892 characters / 150 words");
    }
}
