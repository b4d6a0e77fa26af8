//! Painting tokenizer output
//!
//! Turns a `TaggedNode` tree into an egui `LayoutJob`, coloring each text run
//! by the class names of every element that encloses it.

use crate::html::TaggedNode;
use crate::markdown::{get_tokenizer, Tokenizer};
use crate::theme::SyntaxColors;
use eframe::egui::{self, text::LayoutJob, FontId, TextFormat};

/// Build a layout job for `tree`.
pub fn tagged_layout_job(tree: &TaggedNode, font_id: FontId, syntax: &SyntaxColors) -> LayoutJob {
    let mut job = LayoutJob::default();
    let mut classes: Vec<&str> = Vec::new();
    append_node(&mut job, tree, &mut classes, &font_id, syntax);
    job
}

fn append_node<'a>(
    job: &mut LayoutJob,
    node: &'a TaggedNode,
    classes: &mut Vec<&'a str>,
    font_id: &FontId,
    syntax: &SyntaxColors,
) {
    match node {
        TaggedNode::Text { value } => {
            let format = TextFormat {
                font_id: font_id.clone(),
                color: syntax.for_classes(classes.as_slice()),
                ..Default::default()
            };
            job.append(value, 0.0, format);
        }
        TaggedNode::Element {
            class_names,
            children,
        } => {
            let depth = classes.len();
            classes.extend(class_names.iter().map(String::as_str));
            for child in children {
                append_node(job, child, classes, font_id, syntax);
            }
            classes.truncate(depth);
        }
        TaggedNode::Other { children } => {
            for child in children {
                append_node(job, child, classes, font_id, syntax);
            }
        }
    }
}

/// Tokenize `code` as `language`, reusing the tree stored under `id` while
/// the text is unchanged.
pub fn highlighted(ctx: &egui::Context, id: egui::Id, language: &str, code: &str) -> TaggedNode {
    let cached = ctx.memory(|mem| mem.data.get_temp::<CachedTree>(id));
    if let Some(cached) = cached {
        if cached.language == language && cached.code == code {
            return cached.tree;
        }
    }

    let tree = get_tokenizer().highlight(language, code);
    let entry = CachedTree {
        language: language.to_string(),
        code: code.to_string(),
        tree: tree.clone(),
    };
    ctx.memory_mut(|mem| mem.data.insert_temp(id, entry));
    tree
}

#[derive(Clone)]
struct CachedTree {
    language: String,
    code: String,
    tree: TaggedNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_job_keeps_text() {
        let tree = TaggedNode::root(vec![
            TaggedNode::element(["entity", "name", "tag"], vec![TaggedNode::text("div")]),
            TaggedNode::text(" plain"),
        ]);
        let syntax = SyntaxColors::light();
        let job = tagged_layout_job(&tree, FontId::monospace(12.0), &syntax);

        assert_eq!(job.text, "div plain");
        assert_eq!(job.sections.len(), 2);
        assert_eq!(job.sections[0].format.color, syntax.tag);
        assert_eq!(job.sections[1].format.color, syntax.plain);
    }

    #[test]
    fn test_nested_classes_accumulate() {
        let tree = TaggedNode::element(
            ["meta", "tag"],
            vec![TaggedNode::element(
                ["entity", "name"],
                vec![TaggedNode::text("p")],
            )],
        );
        let syntax = SyntaxColors::dark();
        let job = tagged_layout_job(&tree, FontId::monospace(12.0), &syntax);
        assert_eq!(job.sections[0].format.color, syntax.tag);
    }
}
