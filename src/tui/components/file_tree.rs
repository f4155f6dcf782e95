//! Printable rendering of a repository file tree for the download flow.
//! The root itself is not shown, only its children.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::remote::tree::TreeNode;
use crate::tui::theme;

pub fn tree_text(root: &TreeNode) -> Text<'static> {
    let mut lines = Vec::new();
    push_children(root, "", &mut lines);
    Text::from(lines)
}

fn push_children(node: &TreeNode, indent: &str, lines: &mut Vec<Line<'static>>) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let guide = if last { "└── " } else { "├── " };
        let mut spans = vec![Span::styled(
            format!("{indent}{guide}"),
            Style::default().fg(theme::COMMENT),
        )];
        spans.extend(label(child));
        lines.push(Line::from(spans));

        if child.is_dir() {
            let nested = format!("{indent}{}", if last { "    " } else { "│   " });
            push_children(child, &nested, lines);
        }
    }
}

fn label(node: &TreeNode) -> Vec<Span<'static>> {
    if node.is_dir() {
        return vec![
            Span::raw("📁 "),
            Span::styled(
                node.name.clone(),
                Style::default().fg(theme::PURPLE).add_modifier(Modifier::BOLD),
            ),
        ];
    }

    let bold = Style::default().fg(theme::GREEN).add_modifier(Modifier::BOLD);
    // Extension (from the first dot) is not bold
    let (stem, ext) = match node.name.find('.') {
        Some(dot) => node.name.split_at(dot),
        None => (node.name.as_str(), ""),
    };
    let mut spans = vec![Span::raw("📄 ")];
    if !stem.is_empty() {
        spans.push(Span::styled(stem.to_string(), bold));
    }
    if !ext.is_empty() {
        spans.push(Span::styled(ext.to_string(), Style::default().fg(theme::GREEN)));
    }
    spans
}
