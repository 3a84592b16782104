//! Char-only segments → render tree
//!
//! Segments are flat text. An inserted segment that spans whole paragraphs
//! is called out as new content with a badge instead of a long inline run.

use super::{BlockKind, Mark, RenderNode};
use crate::line_aware::{ChangeKind, Segment};

const NEW_BADGE: &str = "NEW";

pub(super) fn render_segments(segments: &[Segment]) -> RenderNode {
    RenderNode::block(BlockKind::Document, Mark::Unchanged, render_spans(segments))
}

/// Inline nodes for segments, without a wrapping document
pub(super) fn render_spans(segments: &[Segment]) -> Vec<RenderNode> {
    segments
        .iter()
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mark = mark_of(segment.change);
            if segment.change == ChangeKind::Added && is_new_content(&segment.content) {
                RenderNode::block(
                    BlockKind::NewContent,
                    Mark::Inserted,
                    vec![
                        RenderNode::Badge {
                            label: NEW_BADGE.to_string(),
                        },
                        RenderNode::span(segment.content.as_str(), mark),
                    ],
                )
            } else {
                RenderNode::span(segment.content.as_str(), mark)
            }
        })
        .collect()
}

pub(super) fn mark_of(change: ChangeKind) -> Mark {
    match change {
        ChangeKind::Added => Mark::Inserted,
        ChangeKind::Removed => Mark::Deleted,
        ChangeKind::Unchanged => Mark::Unchanged,
    }
}

/// More than one paragraph of inserted text
fn is_new_content(content: &str) -> bool {
    content.trim().contains("\n\n")
}
