//! Syntax tokenizer
//!
//! Wraps syntect behind the `Tokenizer` trait. Instead of resolving styles to
//! colors, the tokenizer keeps syntect's scope stack and turns it into a
//! `TaggedNode` tree: every scope becomes an element whose class names are the
//! dot-separated atoms of the scope (`entity.name.tag` → `["entity", "name", "tag"]`).
//!
//! # Example
//! ```ignore
//! use crate::markdown::syntax::{get_tokenizer, Tokenizer};
//!
//! let tree = get_tokenizer().highlight("html", "<p>hi</p>");
//! let markup = crate::html::render(&tree);
//! ```

use crate::html::TaggedNode;
use log::{debug, warn};
use std::sync::OnceLock;
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Tokenizer Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Turns source text into a class-tagged tree.
pub trait Tokenizer {
    /// Tokenize `text` as `language`. Unknown languages yield a single text node.
    fn highlight(&self, language: &str, text: &str) -> TaggedNode;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn highlight(&self, language: &str, text: &str) -> TaggedNode {
        (**self).highlight(language, text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntect Tokenizer
// ─────────────────────────────────────────────────────────────────────────────

/// Tokenizer backed by syntect's bundled grammars.
pub struct SyntectTokenizer {
    syntax_set: SyntaxSet,
}

impl Default for SyntectTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntectTokenizer {
    /// Load the default syntax set. This is expensive; use `get_tokenizer`.
    pub fn new() -> Self {
        debug!("Loading syntect syntax set");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        debug!("Loaded {} syntaxes", syntax_set.syntaxes().len());
        Self { syntax_set }
    }

    /// Find a syntax definition for a language identifier.
    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }

        let lang_lower = language.to_lowercase();
        let extension = match lang_lower.as_str() {
            "html" | "htm" | "xhtml" => "html",
            "markdown" | "md" => "md",
            "rust" | "rs" => "rs",
            "javascript" | "js" => "js",
            "python" | "py" => "py",
            "css" => "css",
            "json" => "json",
            "xml" => "xml",
            "yaml" | "yml" => "yaml",
            "shell" | "sh" | "bash" => "sh",
            other => other,
        };

        self.syntax_set
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntax_set.find_syntax_by_token(&lang_lower))
    }

    fn tokenize(&self, syntax: &SyntaxReference, text: &str) -> Result<TaggedNode, String> {
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut builder = TreeBuilder::default();

        for line in LinesWithEndings::from(text) {
            let ops = state
                .parse_line(line, &self.syntax_set)
                .map_err(|e| e.to_string())?;

            let mut pos = 0;
            for (offset, op) in ops {
                if offset > pos {
                    builder.push_text(stack.as_slice(), &line[pos..offset]);
                    pos = offset;
                }
                stack.apply(&op).map_err(|e| format!("{:?}", e))?;
            }
            if pos < line.len() {
                builder.push_text(stack.as_slice(), &line[pos..]);
            }
        }

        Ok(builder.finish())
    }
}

impl Tokenizer for SyntectTokenizer {
    fn highlight(&self, language: &str, text: &str) -> TaggedNode {
        let Some(syntax) = self.find_syntax(language) else {
            debug!("No syntax found for language: {}", language);
            return plain(text);
        };

        match self.tokenize(syntax, text) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Failed to tokenize {} source: {}", language, e);
                plain(text)
            }
        }
    }
}

/// Unhighlighted tree for `text`.
fn plain(text: &str) -> TaggedNode {
    if text.is_empty() {
        TaggedNode::root(Vec::new())
    } else {
        TaggedNode::root(vec![TaggedNode::text(text)])
    }
}

/// Class names for a scope, one per atom.
fn class_names(scope: Scope) -> Vec<String> {
    scope
        .build_string()
        .split('.')
        .filter(|atom| !atom.is_empty())
        .map(str::to_string)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds nested elements by diffing the scope stack between text runs.
#[derive(Default)]
struct TreeBuilder {
    root: Vec<TaggedNode>,
    open: Vec<(Scope, Vec<TaggedNode>)>,
}

impl TreeBuilder {
    fn push_text(&mut self, scopes: &[Scope], text: &str) {
        let shared = self
            .open
            .iter()
            .zip(scopes)
            .take_while(|((open, _), scope)| open == *scope)
            .count();

        while self.open.len() > shared {
            self.close_one();
        }
        for scope in &scopes[shared..] {
            self.open.push((*scope, Vec::new()));
        }

        let children = self.current_children();
        match children.last_mut() {
            Some(TaggedNode::Text { value }) => value.push_str(text),
            _ => children.push(TaggedNode::text(text)),
        }
    }

    fn close_one(&mut self) {
        if let Some((scope, children)) = self.open.pop() {
            let node = TaggedNode::element(class_names(scope), children);
            self.current_children().push(node);
        }
    }

    fn current_children(&mut self) -> &mut Vec<TaggedNode> {
        match self.open.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        }
    }

    fn finish(mut self) -> TaggedNode {
        while !self.open.is_empty() {
            self.close_one();
        }
        TaggedNode::root(self.root)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Tokenizer Instance
// ─────────────────────────────────────────────────────────────────────────────

static TOKENIZER: OnceLock<SyntectTokenizer> = OnceLock::new();

/// Get or create the global tokenizer.
pub fn get_tokenizer() -> &'static SyntectTokenizer {
    TOKENIZER.get_or_init(SyntectTokenizer::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
