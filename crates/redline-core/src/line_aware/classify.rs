//! Line classification by markdown markers
//!
//! Each input line becomes one typed entry. Press-release drafts often use a
//! bold line as the headline and an italic line right under it as the
//! subheadline, so those are promoted to level 2 and 3 headings.

use super::{Formatting, SegmentKind};
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("valid heading pattern"));
static ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+(.+)$").expect("valid ordered item pattern"));
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.+)$").expect("valid list item pattern"));
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s+(.+)$").expect("valid blockquote pattern"));
static ALL_BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+)\*\*$").expect("valid bold pattern"));
static ALL_ITALIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*([^*]+)\*|_([^_]+)_)$").expect("valid italic pattern")
});

/// One classified input line
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub kind: SegmentKind,
    /// Line text without its block marker
    pub content: String,
    pub formatting: Formatting,
    /// 1-based line number in the (normalized) input
    pub line: usize,
}

/// Classify every line of `text`
pub fn classify_lines(text: &str) -> Vec<ClassifiedLine> {
    let mut lines: Vec<ClassifiedLine> = Vec::new();
    let mut previous_level: Option<u8> = None;

    for (index, raw) in text.lines().enumerate() {
        let classified = classify_line(raw, index + 1, previous_level);
        if classified.kind != SegmentKind::ParagraphBreak {
            previous_level = classified.formatting.heading;
        }
        lines.push(classified);
    }
    lines
}

fn classify_line(raw: &str, line: usize, previous_level: Option<u8>) -> ClassifiedLine {
    let trimmed = raw.trim();
    let entry = |kind, content: &str, formatting| ClassifiedLine {
        kind,
        content: content.to_string(),
        formatting,
        line,
    };

    if trimmed.is_empty() {
        return entry(SegmentKind::ParagraphBreak, "", Formatting::default());
    }

    // Block markers are checked before whole-line emphasis, so "* item*" is a list item
    if let Some(caps) = HEADING.captures(raw) {
        let level = caps[1].len() as u8;
        return entry(
            SegmentKind::Heading,
            &caps[2],
            Formatting {
                heading: Some(level),
                ..Formatting::default()
            },
        );
    }

    if let Some(caps) = ORDERED_ITEM.captures(raw) {
        return entry(
            SegmentKind::ListItem,
            &caps[1],
            Formatting {
                list_item: true,
                ordered: true,
                ..Formatting::default()
            },
        );
    }

    if let Some(caps) = UNORDERED_ITEM.captures(raw) {
        return entry(
            SegmentKind::ListItem,
            &caps[1],
            Formatting {
                list_item: true,
                ..Formatting::default()
            },
        );
    }

    if let Some(caps) = BLOCKQUOTE.captures(raw) {
        return entry(
            SegmentKind::Blockquote,
            &caps[1],
            Formatting {
                blockquote: true,
                ..Formatting::default()
            },
        );
    }

    // Headline
    if let Some(caps) = ALL_BOLD.captures(trimmed) {
        return entry(
            SegmentKind::Heading,
            &caps[1],
            Formatting {
                bold: true,
                heading: Some(2),
                ..Formatting::default()
            },
        );
    }

    // Subheadline, only directly under a level 2 heading
    if previous_level == Some(2)
        && let Some(caps) = ALL_ITALIC.captures(trimmed)
        && let Some(inner) = caps.get(1).or_else(|| caps.get(2))
    {
        return entry(
            SegmentKind::Heading,
            inner.as_str(),
            Formatting {
                italic: true,
                heading: Some(3),
                ..Formatting::default()
            },
        );
    }

    entry(SegmentKind::Paragraph, raw, Formatting::default())
}
