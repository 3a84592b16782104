//! Line-aware ("markdown aware") diff
//!
//! Used when the structural engine cannot handle a pair of documents, or
//! when the caller prefers it. Lines are classified by their markdown
//! markers, the char differ runs over the joined line contents, and the
//! resulting edits are mapped back onto the lines they belong to.

mod classify;
mod mapping;

pub use classify::{ClassifiedLine, classify_lines};
pub use mapping::{content_lines, map_edits};

use crate::chardiff::diff_chars;
use crate::config::{LineAwareConfig, UnmappedPolicy};
use crate::error::Result;
use crate::normalize::normalize_content;
use serde::{Deserialize, Serialize};

/// Whether a segment was added, removed, or kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Unchanged,
}

/// Block kind a segment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    Heading,
    Paragraph,
    ListItem,
    Blockquote,
    ParagraphBreak,
    /// Plain text of the char-only fallback
    Text,
}

/// Formatting implied by a line's markers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formatting {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<u8>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub list_item: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ordered: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub blockquote: bool,
}

/// A run of text with one change kind, tagged with its source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub change: ChangeKind,
    pub content: String,
    #[serde(default)]
    pub formatting: Formatting,
    pub node_type: SegmentKind,
    /// 1-based line in the "from" document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_line: Option<usize>,
    /// 1-based line in the "to" document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_line: Option<usize>,
}

impl Segment {
    /// Plain text segment without line information
    pub fn text(change: ChangeKind, content: impl Into<String>) -> Self {
        Self {
            change,
            content: content.into(),
            formatting: Formatting::default(),
            node_type: SegmentKind::Text,
            from_line: None,
            to_line: None,
        }
    }

    pub(crate) fn from_line(change: ChangeKind, content: String, line: &ClassifiedLine) -> Self {
        Self {
            change,
            content,
            formatting: line.formatting.clone(),
            node_type: line.kind,
            from_line: None,
            to_line: None,
        }
    }

    pub(crate) fn with_lines(mut self, from_line: Option<usize>, to_line: Option<usize>) -> Self {
        self.from_line = from_line;
        self.to_line = to_line;
        self
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Line-aware differ
#[derive(Debug, Clone)]
pub struct LineAwareDiffer {
    policy: UnmappedPolicy,
    normalize: bool,
}

impl Default for LineAwareDiffer {
    fn default() -> Self {
        Self::new(&LineAwareConfig::default())
    }
}

impl LineAwareDiffer {
    pub fn new(config: &LineAwareConfig) -> Self {
        Self {
            policy: config.unmapped,
            normalize: config.normalize,
        }
    }

    /// Diff two documents line by line
    ///
    /// # Errors
    ///
    /// - `UnmappableSegment` if an edit cannot be placed on a line (strict policy)
    /// - `LineAware` if the edits do not cover every line
    pub fn diff(&self, from: &str, to: &str) -> Result<Vec<Segment>> {
        let (from, to) = if self.normalize {
            (normalize_content(from), normalize_content(to))
        } else {
            (from.to_string(), to.to_string())
        };

        let from_lines = classify_lines(&from);
        let to_lines = classify_lines(&to);

        let script = diff_chars(&joined(&from_lines), &joined(&to_lines));
        log::debug!(
            "line-aware diff over {} / {} lines, {} edits",
            from_lines.len(),
            to_lines.len(),
            script.edits().len()
        );

        map_edits(&from_lines, &to_lines, &script, self.policy)
    }
}

/// Content of all non-break lines joined with `\n`
fn joined(lines: &[ClassifiedLine]) -> String {
    content_lines(lines)
        .iter()
        .map(|line| line.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn differ() -> LineAwareDiffer {
        LineAwareDiffer::default()
    }

    #[test]
    fn test_identical_documents() {
        let text = "**Acme Launches Beacon**\n\n*For small teams*\n\nBody.";
        let segments = differ().diff(text, text).unwrap();
        assert!(segments.iter().all(|s| s.change == ChangeKind::Unchanged));
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].formatting.heading, Some(3));
    }

    #[test]
    fn test_reconstructs_both_sides() {
        let from = "# Beacon\n\n- fast\n- cheap\n\n> Great tool";
        let to = "# Beacon 2\n\n- fast\n- cheaper\n- secure\n\n> Great tool";
        let segments = differ().diff(from, to).unwrap();

        let side = |keep: ChangeKind| -> String {
            segments
                .iter()
                .filter(|s| s.change != keep)
                .map(|s| s.content.as_str())
                .collect()
        };
        assert_eq!(side(ChangeKind::Added), "BeaconfastcheapGreat tool");
        assert_eq!(side(ChangeKind::Removed), "Beacon 2fastcheapersecureGreat tool");
    }

    #[test]
    fn test_normalization_applies() {
        let from = "Here is the draft:\n\nBody.";
        let to = "Body.";
        let segments = differ().diff(from, to).unwrap();
        assert!(segments.iter().all(|s| s.change == ChangeKind::Unchanged));
    }

    #[test]
    fn test_segment_json_shape() {
        let segment = Segment::text(ChangeKind::Added, "new");
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "change": "added",
                "content": "new",
                "formatting": {},
                "nodeType": "text"
            })
        );
    }
}
