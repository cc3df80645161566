//! Output formatting for filtered outlines.
//!
//! Outlines print as an indented tree, two spaces per level, or as the same
//! JSON document shape the filter command reads.

use std::fmt::Write;

use owo_colors::OwoColorize;
use tasktree_rs::{Node, NodeId, NodeKind, Tree};

/// Formats the tree as an indented outline.
///
/// With `only_marked`, unmarked nodes and their subtrees are left out;
/// otherwise they are shown and flagged as hidden.
pub fn format_outline(tree: &Tree, only_marked: bool, use_colors: bool) -> String {
    let mut output = String::new();
    for &root in tree.roots() {
        write_node(&mut output, tree, root, 0, only_marked, use_colors);
    }
    output
}

fn write_node(
    output: &mut String,
    tree: &Tree,
    id: NodeId,
    depth: usize,
    only_marked: bool,
    use_colors: bool,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    if only_marked && !node.marked {
        return;
    }

    let indent = "  ".repeat(depth);
    let _ = writeln!(output, "{indent}{}", format_line(node, use_colors));
    for &child in &node.children {
        write_node(output, tree, child, depth + 1, only_marked, use_colors);
    }
}

/// Formats a single node without indentation.
pub fn format_line(node: &Node, use_colors: bool) -> String {
    let label = match node.kind {
        NodeKind::Folder => format!("{}/", node.name),
        NodeKind::Project => node.name.clone(),
        NodeKind::Context => format!("@{}", node.name),
        NodeKind::Task => {
            let check = if node.is_completed() { "[x]" } else { "[ ]" };
            format!("{check} {}", node.name)
        }
    };

    let label = if use_colors {
        match node.kind {
            NodeKind::Folder => label.blue().bold().to_string(),
            NodeKind::Project => label.bold().to_string(),
            NodeKind::Context => label.cyan().to_string(),
            NodeKind::Task if node.is_completed() => label.dimmed().to_string(),
            NodeKind::Task => label,
        }
    } else {
        label
    };

    let mut line = label;
    if let Some(completed) = node.date_completed {
        let date = completed.format("%Y-%m-%d").to_string();
        if use_colors {
            let _ = write!(line, " {}", date.green());
        } else {
            let _ = write!(line, " ({date})");
        }
    }
    if !node.marked {
        if use_colors {
            let _ = write!(line, " {}", "hidden".red());
        } else {
            line.push_str(" [hidden]");
        }
    }
    line
}

/// Formats the tree as a pretty-printed JSON outline.
pub fn format_outline_json(tree: &Tree, only_marked: bool) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&tree.to_outline(only_marked))
}
