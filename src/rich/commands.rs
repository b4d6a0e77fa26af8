//! Toolbar commands and marks
//!
//! A `FormatCommand` is what a toolbar button asks the rich editor to do; a
//! `Mark` is what the toolbar asks back to decide whether a button is shown
//! as active. Every command maps to exactly one mark.

use crate::markdown::HeadingLevel;

/// A formatting or insertion request from the toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    Heading(HeadingLevel),
    BulletList,
    OrderedList,
    TaskList,
    Blockquote,
    CodeBlock,
    HorizontalRule,
    Link(String),
    Image(String),
    /// 3x3 table with a header row
    Table,
}

impl FormatCommand {
    /// The mark whose active state this command's button reflects.
    pub fn mark(&self) -> Mark {
        match self {
            FormatCommand::Bold => Mark::Bold,
            FormatCommand::Italic => Mark::Italic,
            FormatCommand::Strikethrough => Mark::Strikethrough,
            FormatCommand::InlineCode => Mark::Code,
            FormatCommand::Heading(level) => Mark::Heading(*level),
            FormatCommand::BulletList => Mark::BulletList,
            FormatCommand::OrderedList => Mark::OrderedList,
            FormatCommand::TaskList => Mark::TaskList,
            FormatCommand::Blockquote => Mark::Blockquote,
            FormatCommand::CodeBlock => Mark::CodeBlock,
            FormatCommand::HorizontalRule => Mark::HorizontalRule,
            FormatCommand::Link(_) => Mark::Link,
            FormatCommand::Image(_) => Mark::Image,
            FormatCommand::Table => Mark::Table,
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Strikethrough => "strikethrough",
            FormatCommand::InlineCode => "inline code",
            FormatCommand::Heading(_) => "heading",
            FormatCommand::BulletList => "bullet list",
            FormatCommand::OrderedList => "ordered list",
            FormatCommand::TaskList => "task list",
            FormatCommand::Blockquote => "blockquote",
            FormatCommand::CodeBlock => "code block",
            FormatCommand::HorizontalRule => "horizontal rule",
            FormatCommand::Link(_) => "link",
            FormatCommand::Image(_) => "image",
            FormatCommand::Table => "table",
        }
    }
}

/// A formatting state the rich editor can report as active.
///
/// Marks carry their attributes, so `Heading(H2)` is only active inside a
/// level-two heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Strikethrough,
    Code,
    Heading(HeadingLevel),
    BulletList,
    OrderedList,
    TaskList,
    Blockquote,
    CodeBlock,
    HorizontalRule,
    Link,
    Image,
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_marks() {
        assert_eq!(FormatCommand::InlineCode.mark(), Mark::Code);
        assert_eq!(
            FormatCommand::Heading(HeadingLevel::H3).mark(),
            Mark::Heading(HeadingLevel::H3)
        );
        assert_eq!(FormatCommand::Link("x".into()).mark(), Mark::Link);
    }
}
