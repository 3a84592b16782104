//! Change-magnitude summary (inserted / deleted characters)

use crate::line_aware::{ChangeKind, Segment};
use crate::merge::{DiffStatus, MergedNode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

impl DiffStats {
    /// Count a merged tree
    ///
    /// Added/removed subtrees count their full text once (at the top-most
    /// tagged node); changed nodes count their edit script.
    pub fn from_tree(root: &MergedNode) -> Self {
        let mut stats = Self::default();
        stats.visit(root);
        stats
    }

    fn visit(&mut self, node: &MergedNode) {
        match node.diff_status {
            DiffStatus::Unchanged => {}
            DiffStatus::Added => self.additions += node.text().chars().count(),
            DiffStatus::Removed => {
                let text = node.original_value.clone().unwrap_or_else(|| node.text());
                self.deletions += text.chars().count();
            }
            DiffStatus::Changed => match &node.char_diff {
                Some(script) => {
                    self.additions += script.insertions();
                    self.deletions += script.deletions();
                }
                None => node.children.iter().for_each(|child| self.visit(child)),
            },
        }
    }

    /// Count line-aware or char-only segments
    pub fn from_segments(segments: &[Segment]) -> Self {
        segments.iter().fold(Self::default(), |mut stats, segment| {
            match segment.change {
                ChangeKind::Added => stats.additions += segment.len(),
                ChangeKind::Removed => stats.deletions += segment.len(),
                ChangeKind::Unchanged => {}
            }
            stats
        })
    }

    pub fn is_zero(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}
