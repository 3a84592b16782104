//! Merged tree → render tree
//!
//! Added and removed subtrees are rendered with a uniform mark. A changed
//! node with an edit script is rendered by overlaying the script onto its
//! ("to" side) inline children: each text leaf consumes as many "to"
//! characters from the script as it holds, so every fragment keeps the
//! bold/italic context of the leaf it lands in. Deleted text has no "to"
//! characters; it is emitted where the walk reaches it.

use super::{BlockKind, Mark, RenderNode};
use crate::chardiff::{Edit, EditOp, EditScript};
use crate::markdown::NodeType;
use crate::merge::{DiffStatus, MergedNode};
use std::collections::VecDeque;

/// Inherited inline context
#[derive(Debug, Clone, Copy, Default)]
struct Style {
    mark: Mark,
    strong: bool,
    emphasis: bool,
}

impl Style {
    fn span(&self, text: impl Into<String>) -> RenderNode {
        self.span_marked(text, self.mark)
    }

    fn span_marked(&self, text: impl Into<String>, mark: Mark) -> RenderNode {
        RenderNode::Span {
            text: text.into(),
            mark,
            strong: self.strong,
            emphasis: self.emphasis,
        }
    }
}

pub(super) fn render_tree(root: &MergedNode) -> RenderNode {
    let style = Style::default();
    let children = root
        .children
        .iter()
        .flat_map(|child| render_node(child, style))
        .collect();
    RenderNode::block(BlockKind::Document, Mark::Unchanged, children)
}

fn render_node(node: &MergedNode, inherited: Style) -> Vec<RenderNode> {
    let style = Style {
        mark: match node.diff_status {
            DiffStatus::Added => Mark::Inserted,
            DiffStatus::Removed => Mark::Deleted,
            DiffStatus::Unchanged | DiffStatus::Changed => inherited.mark,
        },
        ..inherited
    };

    if let Some(script) = &node.char_diff {
        return render_overlay(node, script, style);
    }

    // Removed node whose text is only known as the original value
    if node.diff_status == DiffStatus::Removed
        && node.children.is_empty()
        && node.value.is_none()
        && let Some(original) = node.original_value.as_deref().filter(|v| !v.is_empty())
    {
        return wrap(node, style, vec![style.span(original)]);
    }

    match &node.node {
        NodeType::Strong => render_children(node, Style { strong: true, ..style }),
        NodeType::Emphasis => render_children(node, Style { emphasis: true, ..style }),
        NodeType::Text => node
            .value
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| style.span(v.as_str()))
            .collect(),
        _ => {
            let mut children: Vec<RenderNode> = node
                .value
                .iter()
                .filter(|v| !v.is_empty())
                .map(|v| style.span(v.as_str()))
                .collect();
            children.extend(render_children(node, style));
            wrap(node, style, children)
        }
    }
}

fn render_children(node: &MergedNode, style: Style) -> Vec<RenderNode> {
    node.children
        .iter()
        .flat_map(|child| render_node(child, style))
        .collect()
}

/// Block (or placeholder) for a node, or its content unchanged for inline nodes
fn wrap(node: &MergedNode, style: Style, children: Vec<RenderNode>) -> Vec<RenderNode> {
    let kind = match &node.node {
        NodeType::Root => BlockKind::Document,
        NodeType::Heading { depth } => BlockKind::Heading { level: *depth },
        NodeType::Paragraph => BlockKind::Paragraph,
        NodeType::List { ordered, .. } => BlockKind::List { ordered: *ordered },
        NodeType::ListItem { .. } => BlockKind::ListItem,
        NodeType::Blockquote => BlockKind::Blockquote,
        NodeType::Strong | NodeType::Emphasis | NodeType::Text => return children,
        NodeType::Other { kind } => {
            return vec![RenderNode::Unsupported {
                kind: kind.clone(),
                mark: style.mark,
                children,
            }];
        }
    };
    vec![RenderNode::block(kind, style.mark, children)]
}

/// Edit script consumed leaf by leaf
struct EditCursor {
    edits: VecDeque<Edit>,
}

impl EditCursor {
    fn new(script: &EditScript) -> Self {
        Self {
            edits: script.iter().cloned().collect(),
        }
    }

    /// Spans covering the next `len` "to" characters, plus deletions reached on the way
    fn consume(&mut self, mut len: usize, style: Style) -> Vec<RenderNode> {
        let mut spans = Vec::new();

        while len > 0 {
            let Some(front) = self.edits.front_mut() else {
                break;
            };
            match front.op {
                EditOp::Delete => {
                    spans.push(style.span_marked(front.text.clone(), Mark::Deleted));
                    self.edits.pop_front();
                }
                EditOp::Equal | EditOp::Insert => {
                    let mark = if front.op == EditOp::Insert {
                        Mark::Inserted
                    } else {
                        style.mark
                    };
                    let available = front.text.chars().count();
                    if available <= len {
                        spans.push(style.span_marked(front.text.clone(), mark));
                        len -= available;
                        self.edits.pop_front();
                    } else {
                        let split = char_offset(&front.text, len);
                        let rest = front.text.split_off(split);
                        spans.push(style.span_marked(std::mem::replace(&mut front.text, rest), mark));
                        len = 0;
                    }
                }
            }
        }
        spans
    }

    /// Whatever the leaves did not consume (trailing deletions)
    fn drain(&mut self, style: Style) -> Vec<RenderNode> {
        self.edits
            .drain(..)
            .filter(|edit| !edit.text.is_empty())
            .map(|edit| {
                let mark = match edit.op {
                    EditOp::Delete => Mark::Deleted,
                    EditOp::Insert => Mark::Inserted,
                    EditOp::Equal => style.mark,
                };
                style.span_marked(edit.text, mark)
            })
            .collect()
    }
}

fn char_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

fn render_overlay(node: &MergedNode, script: &EditScript, style: Style) -> Vec<RenderNode> {
    let mut cursor = EditCursor::new(script);
    let mut rendered = overlay(node, &mut cursor, style);

    let leftover = cursor.drain(Style {
        strong: false,
        emphasis: false,
        ..style
    });
    if leftover.is_empty() {
        return rendered;
    }
    // A single block keeps trailing deletions inside it
    match rendered.as_mut_slice() {
        [RenderNode::Block { children, .. }] | [RenderNode::Unsupported { children, .. }] => {
            children.extend(leftover);
        }
        _ => rendered.extend(leftover),
    }
    rendered
}

fn overlay(node: &MergedNode, cursor: &mut EditCursor, style: Style) -> Vec<RenderNode> {
    let leaf = |cursor: &mut EditCursor, style: Style| -> Vec<RenderNode> {
        match node.value.as_deref() {
            Some(value) if !value.is_empty() => cursor.consume(value.chars().count(), style),
            _ => Vec::new(),
        }
    };

    match &node.node {
        NodeType::Strong => overlay_children(node, cursor, Style { strong: true, ..style }),
        NodeType::Emphasis => overlay_children(node, cursor, Style { emphasis: true, ..style }),
        NodeType::Text => leaf(cursor, style),
        _ => {
            let mut children = leaf(cursor, style);
            children.extend(overlay_children(node, cursor, style));
            wrap(node, style, children)
        }
    }
}

fn overlay_children(node: &MergedNode, cursor: &mut EditCursor, style: Style) -> Vec<RenderNode> {
    node.children
        .iter()
        .flat_map(|child| overlay(child, cursor, style))
        .collect()
}
