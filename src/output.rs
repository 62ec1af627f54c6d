//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every node leads with its positional index and title; the source file and
//! a description preview are indented context lines underneath. The listing
//! reads as a content inventory while still pointing at the file to edit.
//!
//! ```text
//! Navigation
//! 001 Machine Learning (2 topics)
//!     Source: machine-learning/README.md
//!     Notes on models, training, and evaluation.
//!     001 Large Language Models (2 articles)
//!         Source: machine-learning/llms/README.md
//!         001 Tokenizers
//!             Source: machine-learning/llms/tokenizers/README.md
//!         002 Draft: Attention from scratch (draft)
//!             Source: machine-learning/llms/attention/README.md
//!
//! Home
//!     001 Draft: Attention from scratch → machine-learning/llms/attention
//!
//! Redirects
//!     /attention-explained → /machine-learning/llms/attention
//! ```
//!
//! The report lists one diagnostic per line followed by a summary:
//!
//! ```text
//! error[ordering] ordering.json5: group "ml": slug 'foo' does not exist under 'ml'
//! warning[structure] ml/old/README.md: excluded from navigation: ...
//!
//! 1 error, 1 warning
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return `Vec<String>` and do no I/O; `print_*`
//! wrappers write them to stdout.

use crate::diagnostics::Report;
use crate::metadata;
use crate::types::{ContentNode, NavigationModel, NodeKind};

const DESCRIPTION_PREVIEW: usize = 60;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a node header: positional index + title, with child count and
/// draft marker.
///
/// ```text
/// 001 Machine Learning (2 topics)
/// 002 Draft: Attention from scratch (draft)
/// ```
fn entity_header(index: usize, node: &ContentNode) -> String {
    let mut header = format!("{} {}", format_index(index), node.title);
    let child_label = match node.kind {
        NodeKind::Category => Some("topic"),
        NodeKind::Topic => Some("article"),
        NodeKind::Article => None,
    };
    if let Some(label) = child_label {
        let n = node.children.len();
        let plural = if n == 1 { "" } else { "s" };
        header.push_str(&format!(" ({n} {label}{plural})"));
    }
    if node.is_draft() {
        header.push_str(" (draft)");
    }
    header
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the navigation tree.
struct TreeNode<'a> {
    depth: usize,
    position: usize,
    node: &'a ContentNode,
}

/// Walk the navigation tree, assigning positional indices per sibling level.
fn walk_tree(nodes: &[ContentNode]) -> Vec<TreeNode<'_>> {
    let mut out = Vec::new();
    walk_tree_recursive(nodes, 0, &mut out);
    out
}

fn walk_tree_recursive<'a>(
    nodes: &'a [ContentNode],
    depth: usize,
    out: &mut Vec<TreeNode<'a>>,
) {
    for (i, node) in nodes.iter().enumerate() {
        out.push(TreeNode {
            depth,
            position: i + 1,
            node,
        });
        walk_tree_recursive(&node.children, depth + 1, out);
    }
}

// ============================================================================
// Navigation model
// ============================================================================

/// Format the assembled navigation model: tree, homepage picks, redirects.
pub fn format_model(model: &NavigationModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(name) = &model.site.name {
        match &model.site.base_url {
            Some(url) => lines.push(format!("Site: {name} ({url})")),
            None => lines.push(format!("Site: {name}")),
        }
        lines.push(String::new());
    }

    lines.push("Navigation".to_string());
    for entry in walk_tree(&model.categories) {
        let base_indent = indent(entry.depth);
        lines.push(format!(
            "{}{}",
            base_indent,
            entity_header(entry.position, entry.node)
        ));
        lines.push(format!("{}    Source: {}", base_indent, entry.node.path));

        let description = metadata::plain_text(&entry.node.description);
        let preview = truncate_desc(&description, DESCRIPTION_PREVIEW);
        if !preview.is_empty() {
            lines.push(format!("{}    {}", base_indent, preview));
        }
        if let Some(date) = entry.node.last_updated_on {
            lines.push(format!("{}    Updated: {}", base_indent, date));
        }
    }

    let featured = model.featured();
    if !featured.is_empty() {
        lines.push(String::new());
        lines.push("Home".to_string());
        for (i, node) in featured.iter().enumerate() {
            lines.push(format!(
                "    {} {} → {}",
                format_index(i + 1),
                node.title,
                node.slug_path
            ));
        }
    }

    if !model.redirects.is_empty() {
        lines.push(String::new());
        lines.push("Redirects".to_string());
        for (from, to) in &model.redirects {
            lines.push(format!("    {from} → {to}"));
        }
    }

    lines
}

/// Print the navigation model to stdout.
pub fn print_model(model: &NavigationModel) {
    for line in format_model(model) {
        println!("{}", line);
    }
}

// ============================================================================
// Report
// ============================================================================

/// Format the validation report: one line per diagnostic, then a summary.
pub fn format_report(report: &Report) -> Vec<String> {
    let mut lines: Vec<String> = report
        .diagnostics()
        .iter()
        .map(|d| d.to_string())
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format_summary(report));
    lines
}

/// `"2 errors, 1 warning"`, or `"No problems found"`.
pub fn format_summary(report: &Report) -> String {
    if report.is_empty() {
        "No problems found".to_string()
    } else {
        format!(
            "{}, {}",
            plural(report.error_count(), "error"),
            plural(report.warning_count(), "warning")
        )
    }
}

/// Print the validation report to stdout.
pub fn print_report(report: &Report) {
    for line in format_report(report) {
        println!("{}", line);
    }
}
