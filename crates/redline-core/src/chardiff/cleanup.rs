//! Semantic cleanup of raw edit scripts
//!
//! Works on char vectors internally so every split lands on a char boundary.
//!
//! - `eliminate_trivial_equalities`: an equality no longer than the edits on
//!   both of its sides is folded into them (delete + insert of the same text)
//! - `merge`: coalesces runs, factors shared prefix/suffix out of
//!   delete/insert pairs, slides single edits over their neighbours
//! - `align_to_boundaries`: slides a single edit between two equalities to the
//!   position with the best word/line boundary score

use super::{Edit, EditOp};

#[derive(Debug, Clone, PartialEq)]
struct Chunk {
    op: EditOp,
    chars: Vec<char>,
}

impl Chunk {
    fn new(op: EditOp, chars: Vec<char>) -> Self {
        Self { op, chars }
    }
}

pub(super) fn cleanup_semantic(edits: Vec<Edit>) -> Vec<Edit> {
    let mut chunks: Vec<Chunk> = edits
        .into_iter()
        .filter(|e| !e.text.is_empty())
        .map(|e| Chunk::new(e.op, e.text.chars().collect()))
        .collect();

    eliminate_trivial_equalities(&mut chunks);
    merge(&mut chunks);
    align_to_boundaries(&mut chunks);

    chunks
        .into_iter()
        .map(|c| Edit::new(c.op, c.chars.into_iter().collect::<String>()))
        .collect()
}

fn eliminate_trivial_equalities(chunks: &mut Vec<Chunk>) {
    // Indices of equalities seen so far
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;

    // Edit lengths on either side of the last equality
    let (mut ins_before, mut del_before) = (0usize, 0usize);
    let (mut ins_after, mut del_after) = (0usize, 0usize);

    let mut pointer = 0usize;
    while pointer < chunks.len() {
        if chunks[pointer].op == EditOp::Equal {
            equalities.push(pointer);
            ins_before = ins_after;
            del_before = del_after;
            ins_after = 0;
            del_after = 0;
            last_equality = Some(chunks[pointer].chars.clone());
            pointer += 1;
            continue;
        }

        if chunks[pointer].op == EditOp::Insert {
            ins_after += chunks[pointer].chars.len();
        } else {
            del_after += chunks[pointer].chars.len();
        }

        let foldable = last_equality.as_ref().is_some_and(|eq| {
            eq.len() <= ins_before.max(del_before) && eq.len() <= ins_after.max(del_after)
        });

        if foldable && let (Some(eq), Some(index)) = (last_equality.take(), equalities.pop()) {
            // Equality becomes delete + insert of the same text
            chunks.insert(index, Chunk::new(EditOp::Delete, eq));
            chunks[index + 1].op = EditOp::Insert;

            // The previous equality has to be re-evaluated too
            equalities.pop();
            ins_before = 0;
            del_before = 0;
            ins_after = 0;
            del_after = 0;

            pointer = match equalities.last() {
                Some(&previous) => previous + 1,
                None => 0,
            };
            continue;
        }

        pointer += 1;
    }
}

/// Coalesce and normalize until stable
fn merge(chunks: &mut Vec<Chunk>) {
    loop {
        coalesce(chunks);
        if !slide_single_edits(chunks) {
            break;
        }
    }
}

/// One pass: merge equal runs, turn each run of edits into delete-then-insert
/// with shared prefix/suffix moved into the neighbouring equalities
fn coalesce(chunks: &mut Vec<Chunk>) {
    let mut out: Vec<Chunk> = Vec::with_capacity(chunks.len());
    let mut index = 0;

    while index < chunks.len() {
        if chunks[index].op == EditOp::Equal {
            push_equal(&mut out, chunks[index].chars.clone());
            index += 1;
            continue;
        }

        let mut deleted: Vec<char> = Vec::new();
        let mut inserted: Vec<char> = Vec::new();
        while index < chunks.len() && chunks[index].op != EditOp::Equal {
            match chunks[index].op {
                EditOp::Delete => deleted.extend_from_slice(&chunks[index].chars),
                _ => inserted.extend_from_slice(&chunks[index].chars),
            }
            index += 1;
        }

        let mut suffix: Vec<char> = Vec::new();
        if !deleted.is_empty() && !inserted.is_empty() {
            let prefix_len = common_prefix_len(&deleted, &inserted);
            if prefix_len > 0 {
                push_equal(&mut out, inserted[..prefix_len].to_vec());
                deleted.drain(..prefix_len);
                inserted.drain(..prefix_len);
            }

            let suffix_len = common_suffix_len(&deleted, &inserted);
            if suffix_len > 0 {
                suffix = inserted[inserted.len() - suffix_len..].to_vec();
                deleted.truncate(deleted.len() - suffix_len);
                inserted.truncate(inserted.len() - suffix_len);
            }
        }

        if !deleted.is_empty() {
            out.push(Chunk::new(EditOp::Delete, deleted));
        }
        if !inserted.is_empty() {
            out.push(Chunk::new(EditOp::Insert, inserted));
        }
        if !suffix.is_empty() {
            push_equal(&mut out, suffix);
        }
    }

    *chunks = out;
}

fn push_equal(out: &mut Vec<Chunk>, chars: Vec<char>) {
    if chars.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(last) if last.op == EditOp::Equal => last.chars.extend(chars),
        _ => out.push(Chunk::new(EditOp::Equal, chars)),
    }
}

/// Slide a single edit surrounded by equalities when it can swallow one of them,
/// e.g. `A<ins>BA</ins>C` → `<ins>AB</ins>AC`. Returns true if anything moved.
fn slide_single_edits(chunks: &mut Vec<Chunk>) -> bool {
    for index in 1..chunks.len().saturating_sub(1) {
        if chunks[index - 1].op != EditOp::Equal || chunks[index + 1].op != EditOp::Equal {
            continue;
        }

        let previous = chunks[index - 1].chars.clone();
        let current = chunks[index].chars.clone();
        let next = chunks[index + 1].chars.clone();

        if current.ends_with(&previous) {
            // Shift left
            let mut shifted = previous.clone();
            shifted.extend_from_slice(&current[..current.len() - previous.len()]);
            let mut following = previous;
            following.extend(next);

            chunks[index].chars = shifted;
            chunks[index + 1].chars = following;
            chunks.remove(index - 1);
            return true;
        }

        if current.starts_with(&next) {
            // Shift right
            chunks[index - 1].chars.extend_from_slice(&next);
            let mut shifted = current[next.len()..].to_vec();
            shifted.extend(next);

            chunks[index].chars = shifted;
            chunks.remove(index + 1);
            return true;
        }
    }
    false
}

/// Slide single edits onto the best boundary between their equalities
fn align_to_boundaries(chunks: &mut Vec<Chunk>) {
    let mut index = 1;
    while index + 1 < chunks.len() {
        if chunks[index - 1].op != EditOp::Equal || chunks[index + 1].op != EditOp::Equal {
            index += 1;
            continue;
        }

        let mut before = chunks[index - 1].chars.clone();
        let mut edit = chunks[index].chars.clone();
        let mut after = chunks[index + 1].chars.clone();

        // Shift the edit as far left as possible
        let shared = common_suffix_len(&before, &edit);
        if shared > 0 {
            let common = edit[edit.len() - shared..].to_vec();
            before.truncate(before.len() - shared);
            let mut shifted = common.clone();
            shifted.extend_from_slice(&edit[..edit.len() - shared]);
            edit = shifted;
            let mut following = common;
            following.extend(after);
            after = following;
        }

        // Step right one char at a time, keeping the best-scoring position
        let mut best = (before.clone(), edit.clone(), after.clone());
        let mut best_score = boundary_score(&before, &edit) + boundary_score(&edit, &after);
        while !edit.is_empty() && !after.is_empty() && edit[0] == after[0] {
            let c = edit.remove(0);
            before.push(c);
            edit.push(c);
            after.remove(0);

            let score = boundary_score(&before, &edit) + boundary_score(&edit, &after);
            // >= so that edits end up as far right as ties allow
            if score >= best_score {
                best_score = score;
                best = (before.clone(), edit.clone(), after.clone());
            }
        }

        let (best_before, best_edit, best_after) = best;
        if chunks[index - 1].chars != best_before {
            chunks[index].chars = best_edit;
            if best_after.is_empty() {
                chunks.remove(index + 1);
            } else {
                chunks[index + 1].chars = best_after;
            }
            if best_before.is_empty() {
                chunks.remove(index - 1);
                // The edit moved into index - 1
                continue;
            }
            chunks[index - 1].chars = best_before;
        }
        index += 1;
    }
}

/// Score how good a split between `one` and `two` is (0 = mid-word, 6 = edge)
fn boundary_score(one: &[char], two: &[char]) -> u8 {
    let (Some(&last), Some(&first)) = (one.last(), two.first()) else {
        return 6;
    };

    let non_alnum_1 = !last.is_alphanumeric();
    let non_alnum_2 = !first.is_alphanumeric();
    let whitespace_1 = non_alnum_1 && last.is_whitespace();
    let whitespace_2 = non_alnum_2 && first.is_whitespace();
    let line_break_1 = whitespace_1 && (last == '\n' || last == '\r');
    let line_break_2 = whitespace_2 && (first == '\n' || first == '\r');
    let blank_line_1 = line_break_1 && ends_with_blank_line(one);
    let blank_line_2 = line_break_2 && starts_with_blank_line(two);

    if blank_line_1 || blank_line_2 {
        5
    } else if line_break_1 || line_break_2 {
        4
    } else if non_alnum_1 && !whitespace_1 && whitespace_2 {
        // End of sentence
        3
    } else if whitespace_1 || whitespace_2 {
        2
    } else if non_alnum_1 || non_alnum_2 {
        1
    } else {
        0
    }
}

fn ends_with_blank_line(chars: &[char]) -> bool {
    chars.ends_with(&['\n', '\n']) || chars.ends_with(&['\n', '\r', '\n'])
}

fn starts_with_blank_line(chars: &[char]) -> bool {
    let mut rest = chars;
    for _ in 0..2 {
        rest = rest.strip_prefix(&['\r']).unwrap_or(rest);
        match rest.strip_prefix(&['\n']) {
            Some(tail) => rest = tail,
            None => return false,
        }
    }
    true
}

fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix_len(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(edits: Vec<Edit>) -> Vec<(EditOp, String)> {
        cleanup_semantic(edits)
            .into_iter()
            .map(|e| (e.op, e.text))
            .collect()
    }

    fn pair(op: EditOp, text: &str) -> (EditOp, String) {
        (op, text.to_string())
    }

    #[test]
    fn test_folds_single_char_equality() {
        let result = run(vec![
            Edit::delete("a"),
            Edit::equal("b"),
            Edit::delete("c"),
        ]);
        assert_eq!(result, vec![pair(EditOp::Delete, "abc"), pair(EditOp::Insert, "b")]);
    }

    #[test]
    fn test_keeps_large_equality() {
        let edits = vec![
            Edit::delete("ab"),
            Edit::equal("cd"),
            Edit::delete("e"),
            Edit::equal("f"),
            Edit::insert("g"),
        ];
        let result = run(edits);
        assert_eq!(
            result,
            vec![
                pair(EditOp::Delete, "abcdef"),
                pair(EditOp::Insert, "cdfg"),
            ]
        );
    }

    #[test]
    fn test_no_change_without_edits() {
        let result = run(vec![Edit::equal("abc")]);
        assert_eq!(result, vec![pair(EditOp::Equal, "abc")]);
    }

    #[test]
    fn test_aligns_edit_to_word_boundary() {
        // "The c<ins>at c</ins>ame." → "The <ins>cat </ins>came."
        let result = run(vec![
            Edit::equal("The c"),
            Edit::insert("at c"),
            Edit::equal("ame."),
        ]);
        assert_eq!(
            result,
            vec![
                pair(EditOp::Equal, "The "),
                pair(EditOp::Insert, "cat "),
                pair(EditOp::Equal, "came."),
            ]
        );
    }

    #[test]
    fn test_aligns_to_blank_line() {
        let result = run(vec![
            Edit::equal("Intro\n\nA"),
            Edit::insert("dded\n\nA"),
            Edit::equal("fter"),
        ]);
        assert_eq!(
            result,
            vec![
                pair(EditOp::Equal, "Intro\n\n"),
                pair(EditOp::Insert, "Added\n\n"),
                pair(EditOp::Equal, "After"),
            ]
        );
    }

    #[test]
    fn test_coalesce_factors_prefix_and_suffix() {
        let mut chunks = vec![
            Chunk::new(EditOp::Delete, "abxc".chars().collect()),
            Chunk::new(EditOp::Insert, "abyc".chars().collect()),
        ];
        coalesce(&mut chunks);
        let texts: Vec<(EditOp, String)> = chunks
            .into_iter()
            .map(|c| (c.op, c.chars.into_iter().collect()))
            .collect();
        assert_eq!(
            texts,
            vec![
                pair(EditOp::Equal, "ab"),
                pair(EditOp::Delete, "x"),
                pair(EditOp::Insert, "y"),
                pair(EditOp::Equal, "c"),
            ]
        );
    }

    #[test]
    fn test_slide_swallows_previous_equality() {
        let mut chunks = vec![
            Chunk::new(EditOp::Equal, vec!['a']),
            Chunk::new(EditOp::Insert, vec!['b', 'a']),
            Chunk::new(EditOp::Equal, vec!['c']),
        ];
        merge(&mut chunks);
        let texts: Vec<(EditOp, String)> = chunks
            .into_iter()
            .map(|c| (c.op, c.chars.into_iter().collect()))
            .collect();
        assert_eq!(
            texts,
            vec![pair(EditOp::Insert, "ab"), pair(EditOp::Equal, "ac")]
        );
    }

    #[test]
    fn test_boundary_scores() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(boundary_score(&chars(""), &chars("x")), 6);
        assert_eq!(boundary_score(&chars("a\n\n"), &chars("b")), 5);
        assert_eq!(boundary_score(&chars("a\n"), &chars("b")), 4);
        assert_eq!(boundary_score(&chars("end."), &chars(" Next")), 3);
        assert_eq!(boundary_score(&chars("word "), &chars("next")), 2);
        assert_eq!(boundary_score(&chars("a-"), &chars("b")), 1);
        assert_eq!(boundary_score(&chars("ab"), &chars("cd")), 0);
    }
}
