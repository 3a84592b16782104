//! Mapping a flat edit script back onto classified lines
//!
//! The char diff runs over the line contents joined with `\n`. Walking the
//! script with one cursor per side recovers, for every fragment, the line(s)
//! it came from: a `\n` inside a fragment is only valid exactly at the end
//! of a line, and every piece between separators must be the next text of
//! the current line.

use super::classify::ClassifiedLine;
use super::{ChangeKind, Segment, SegmentKind};
use crate::chardiff::{EditOp, EditScript};
use crate::config::UnmappedPolicy;
use crate::error::{DiffError, Result, Side};

/// Position inside one side's content lines
struct Cursor<'a> {
    side: Side,
    lines: Vec<&'a ClassifiedLine>,
    line: usize,
    offset: usize,
}

/// A fragment piece placed on a line
struct Placed<'a> {
    line: &'a ClassifiedLine,
    text: String,
}

impl<'a> Cursor<'a> {
    fn new(side: Side, lines: Vec<&'a ClassifiedLine>) -> Self {
        Self {
            side,
            lines,
            line: 0,
            offset: 0,
        }
    }

    /// Place a fragment, advancing the cursor only if all of it fits
    fn place(&mut self, fragment: &str) -> Result<Vec<Placed<'a>>> {
        let side = self.side;
        let unmappable = || DiffError::UnmappableSegment {
            side,
            fragment: fragment.to_string(),
        };

        let (mut line, mut offset) = (self.line, self.offset);
        let mut placed = Vec::new();
        let mut rest = fragment;

        while !rest.is_empty() {
            let current = self.lines.get(line).copied().ok_or_else(unmappable)?;
            let remaining = &current.content[offset..];

            if remaining.is_empty() {
                // Only a separator may follow the end of a line
                rest = rest.strip_prefix('\n').ok_or_else(unmappable)?;
                line += 1;
                offset = 0;
                continue;
            }

            let piece_len = rest.find('\n').unwrap_or(rest.len());
            let piece = &rest[..piece_len];
            if piece.is_empty() || !remaining.starts_with(piece) {
                return Err(unmappable());
            }

            placed.push(Placed {
                line: current,
                text: piece.to_string(),
            });
            offset += piece_len;
            rest = &rest[piece_len..];
        }

        self.line = line;
        self.offset = offset;
        Ok(placed)
    }

    fn exhausted(&self) -> bool {
        match self.lines.get(self.line) {
            None => true,
            Some(last) => self.line + 1 == self.lines.len() && self.offset == last.content.len(),
        }
    }
}

/// Lines that carry content (everything but paragraph breaks)
pub fn content_lines(lines: &[ClassifiedLine]) -> Vec<&ClassifiedLine> {
    lines
        .iter()
        .filter(|l| l.kind != SegmentKind::ParagraphBreak)
        .collect()
}

/// Turn an edit script over joined line contents into line-tagged segments
///
/// Equal fragments are emitted once, on the "to" side.
///
/// # Errors
///
/// - `UnmappableSegment` if a fragment does not fit its side (strict policy)
/// - `LineAware` if the script leaves content of either side unvisited
pub fn map_edits(
    from_lines: &[ClassifiedLine],
    to_lines: &[ClassifiedLine],
    script: &EditScript,
    policy: UnmappedPolicy,
) -> Result<Vec<Segment>> {
    let mut from = Cursor::new(Side::From, content_lines(from_lines));
    let mut to = Cursor::new(Side::To, content_lines(to_lines));

    let mut segments = Vec::new();
    for edit in script {
        let placed = match edit.op {
            EditOp::Equal => from.place(&edit.text).and_then(|from_pieces| {
                let to_pieces = to.place(&edit.text)?;
                Ok(to_pieces
                    .into_iter()
                    .zip(from_pieces)
                    .map(|(t, f)| {
                        Segment::from_line(ChangeKind::Unchanged, t.text, t.line)
                            .with_lines(Some(f.line.line), Some(t.line.line))
                    })
                    .collect::<Vec<_>>())
            }),
            EditOp::Delete => from.place(&edit.text).map(|pieces| {
                pieces
                    .into_iter()
                    .map(|p| {
                        Segment::from_line(ChangeKind::Removed, p.text, p.line)
                            .with_lines(Some(p.line.line), None)
                    })
                    .collect()
            }),
            EditOp::Insert => to.place(&edit.text).map(|pieces| {
                pieces
                    .into_iter()
                    .map(|p| {
                        Segment::from_line(ChangeKind::Added, p.text, p.line)
                            .with_lines(None, Some(p.line.line))
                    })
                    .collect()
            }),
        };

        match (placed, policy) {
            (Ok(found), _) => segments.extend(found),
            (Err(err), UnmappedPolicy::Lenient) => {
                log::warn!("Dropping fragment: {}", err);
            }
            (Err(err), UnmappedPolicy::Strict) => return Err(err),
        }
    }

    if policy == UnmappedPolicy::Strict && !(from.exhausted() && to.exhausted()) {
        return Err(DiffError::LineAware(
            "edit script ended before all lines were mapped".to_string(),
        ));
    }

    Ok(segments)
}
