//! Line-aware segments → render tree
//!
//! Consecutive segments of the same source line form one block. A segment
//! joins the open block when it shares its "from" or "to" line; a removed
//! line followed by its replacement therefore renders as two blocks.

use super::char_only::{mark_of, render_spans};
use super::{BlockKind, Mark, RenderNode};
use crate::line_aware::{Segment, SegmentKind};

const DEFAULT_HEADING_LEVEL: u8 = 2;

/// Segments of one source line
struct Group<'a> {
    kind: SegmentKind,
    from_line: Option<usize>,
    to_line: Option<usize>,
    segments: Vec<&'a Segment>,
}

impl<'a> Group<'a> {
    fn open(segment: &'a Segment) -> Self {
        Self {
            kind: segment.node_type,
            from_line: segment.from_line,
            to_line: segment.to_line,
            segments: vec![segment],
        }
    }

    fn accepts(&self, segment: &Segment) -> bool {
        let same_line = |mine: Option<usize>, theirs: Option<usize>| {
            matches!((mine, theirs), (Some(a), Some(b)) if a == b)
        };
        segment.node_type == self.kind
            && (same_line(self.from_line, segment.from_line)
                || same_line(self.to_line, segment.to_line))
    }

    fn push(&mut self, segment: &'a Segment) {
        self.from_line = segment.from_line.or(self.from_line);
        self.to_line = segment.to_line.or(self.to_line);
        self.segments.push(segment);
    }

    fn ordered(&self) -> bool {
        self.segments.iter().any(|s| s.formatting.ordered)
    }

    fn render(&self) -> RenderNode {
        let spans: Vec<RenderNode> = self
            .segments
            .iter()
            .filter(|segment| !segment.is_empty())
            .map(|segment| RenderNode::Span {
                text: segment.content.clone(),
                mark: mark_of(segment.change),
                strong: segment.formatting.bold,
                emphasis: segment.formatting.italic,
            })
            .collect();

        let kind = match self.kind {
            SegmentKind::Heading => BlockKind::Heading {
                level: self
                    .segments
                    .iter()
                    .find_map(|s| s.formatting.heading)
                    .unwrap_or(DEFAULT_HEADING_LEVEL),
            },
            SegmentKind::ListItem => BlockKind::ListItem,
            SegmentKind::Blockquote => BlockKind::Blockquote,
            SegmentKind::Paragraph | SegmentKind::ParagraphBreak | SegmentKind::Text => {
                BlockKind::Paragraph
            }
        };
        RenderNode::block(kind, shared_mark(&spans), spans)
    }
}

/// The shared mark of all nodes, if they agree on a change
fn shared_mark(nodes: &[RenderNode]) -> Mark {
    let mut marks = nodes.iter().filter_map(|node| match node {
        RenderNode::Span { mark, .. } | RenderNode::Block { mark, .. } => Some(*mark),
        _ => None,
    });
    match marks.next() {
        Some(first) if first != Mark::Unchanged && marks.all(|m| m == first) => first,
        _ => Mark::Unchanged,
    }
}

pub(super) fn render_segments(segments: &[Segment]) -> RenderNode {
    let mut children: Vec<RenderNode> = Vec::new();
    let mut groups: Vec<Group> = Vec::new();

    let mut index = 0;
    while index < segments.len() {
        let segment = &segments[index];
        match segment.node_type {
            SegmentKind::ParagraphBreak => {}
            SegmentKind::Text => {
                // Plain text from the char-only fallback
                let run = segments[index..]
                    .iter()
                    .take_while(|s| s.node_type == SegmentKind::Text)
                    .count();
                children.extend(blocks(std::mem::take(&mut groups)));
                children.extend(render_spans(&segments[index..index + run]));
                index += run;
                continue;
            }
            _ => match groups.last_mut() {
                Some(group) if group.accepts(segment) => group.push(segment),
                _ => groups.push(Group::open(segment)),
            },
        }
        index += 1;
    }
    children.extend(blocks(std::mem::take(&mut groups)));

    RenderNode::block(BlockKind::Document, Mark::Unchanged, children)
}

/// Blocks for line groups, with consecutive list items wrapped in lists
fn blocks(groups: Vec<Group>) -> Vec<RenderNode> {
    let mut out: Vec<RenderNode> = Vec::new();
    let mut list: Option<(bool, Vec<RenderNode>)> = None;

    for group in &groups {
        if group.kind == SegmentKind::ListItem {
            let ordered = group.ordered();
            match &mut list {
                Some((current, items)) if *current == ordered => items.push(group.render()),
                _ => {
                    if let Some((ordered, items)) = list.take() {
                        out.push(list_block(ordered, items));
                    }
                    list = Some((ordered, vec![group.render()]));
                }
            }
            continue;
        }
        if let Some((ordered, items)) = list.take() {
            out.push(list_block(ordered, items));
        }
        out.push(group.render());
    }
    if let Some((ordered, items)) = list.take() {
        out.push(list_block(ordered, items));
    }
    out
}

fn list_block(ordered: bool, items: Vec<RenderNode>) -> RenderNode {
    RenderNode::block(BlockKind::List { ordered }, shared_mark(&items), items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_aware::{ChangeKind, LineAwareDiffer};

    fn rendered(from: &str, to: &str) -> RenderNode {
        render_segments(&LineAwareDiffer::default().diff(from, to).unwrap())
    }

    fn kinds(node: &RenderNode) -> Vec<BlockKind> {
        node.children()
            .iter()
            .filter_map(|child| match child {
                RenderNode::Block { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_lines_become_blocks() {
        let tree = rendered(
            "**Acme Launches Beacon**\n\n*For small teams*\n\nBeacon is live.",
            "**Acme Launches Beacon**\n\n*For small teams*\n\nBeacon is live today.",
        );

        assert_eq!(
            kinds(&tree),
            vec![
                BlockKind::Heading { level: 2 },
                BlockKind::Heading { level: 3 },
                BlockKind::Paragraph,
            ]
        );
        let headline = &tree.children()[0].children()[0];
        assert!(matches!(headline, RenderNode::Span { strong: true, .. }));

        let body = &tree.children()[2];
        assert_eq!(body.new_text(), "Beacon is live today.");
        assert_eq!(body.text_marked(&[Mark::Inserted]), " today");
    }

    #[test]
    fn test_list_items_are_wrapped() {
        let tree = rendered("Intro\n\n- fast\n- cheap", "Intro\n\n- fast\n- cheap\n- secure");

        assert_eq!(
            kinds(&tree),
            vec![BlockKind::Paragraph, BlockKind::List { ordered: false }]
        );
        let list = &tree.children()[1];
        assert_eq!(list.children().len(), 3);
        assert!(matches!(
            list.children()[2],
            RenderNode::Block {
                kind: BlockKind::ListItem,
                mark: Mark::Inserted,
                ..
            }
        ));
    }

    #[test]
    fn test_ordered_and_unordered_lists_split() {
        let segments = vec![
            Segment {
                formatting: crate::line_aware::Formatting {
                    list_item: true,
                    ..Default::default()
                },
                node_type: SegmentKind::ListItem,
                ..Segment::text(ChangeKind::Unchanged, "bullet")
            }
            .with_lines(Some(1), Some(1)),
            Segment {
                formatting: crate::line_aware::Formatting {
                    list_item: true,
                    ordered: true,
                    ..Default::default()
                },
                node_type: SegmentKind::ListItem,
                ..Segment::text(ChangeKind::Unchanged, "step")
            }
            .with_lines(Some(2), Some(2)),
        ];
        let tree = render_segments(&segments);
        assert_eq!(
            kinds(&tree),
            vec![
                BlockKind::List { ordered: false },
                BlockKind::List { ordered: true }
            ]
        );
    }

    #[test]
    fn test_removed_line_is_deleted_block() {
        let tree = rendered("Keep.\n\nDrop this line.", "Keep.");
        let last = tree.children().last().unwrap();
        assert!(matches!(
            last,
            RenderNode::Block {
                mark: Mark::Deleted,
                ..
            }
        ));
        assert_eq!(tree.new_text(), "Keep.");
    }

    #[test]
    fn test_text_segments_render_inline() {
        let tree = render_segments(&[
            Segment::text(ChangeKind::Unchanged, "a "),
            Segment::text(ChangeKind::Added, "b"),
        ]);
        assert_eq!(
            tree.children(),
            &[
                RenderNode::span("a ", Mark::Unchanged),
                RenderNode::span("b", Mark::Inserted)
            ]
        );
    }
}
