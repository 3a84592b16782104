//! Character differ
//!
//! Myers diff over chars (via `similar`) followed by a semantic cleanup pass
//! that folds trivial equalities into the surrounding edits and slides edits
//! onto word boundaries.
//!
//! # Round-trip law
//!
//! For every script produced here:
//! - concatenating non-delete fragments yields the "to" string
//! - concatenating non-insert fragments yields the "from" string

mod cleanup;

use crate::error::{DiffError, Result};
use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

/// Edit operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOp {
    Equal,
    Insert,
    Delete,
}

/// One (operation, text) pair of an edit script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub op: EditOp,
    pub text: String,
}

impl Edit {
    pub fn new(op: EditOp, text: impl Into<String>) -> Self {
        Self {
            op,
            text: text.into(),
        }
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(EditOp::Equal, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(EditOp::Insert, text)
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(EditOp::Delete, text)
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Ordered sequence of edits transforming one string into another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript(Vec<Edit>);

impl EditScript {
    pub fn new(edits: Vec<Edit>) -> Self {
        Self(edits)
    }

    pub fn edits(&self) -> &[Edit] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.0.iter()
    }

    pub fn into_edits(self) -> Vec<Edit> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reconstruct the "from" string
    pub fn from_text(&self) -> String {
        self.0
            .iter()
            .filter(|e| e.op != EditOp::Insert)
            .map(|e| e.text.as_str())
            .collect()
    }

    /// Reconstruct the "to" string
    pub fn to_text(&self) -> String {
        self.0
            .iter()
            .filter(|e| e.op != EditOp::Delete)
            .map(|e| e.text.as_str())
            .collect()
    }

    /// Inserted chars
    pub fn insertions(&self) -> usize {
        self.count(EditOp::Insert)
    }

    /// Deleted chars
    pub fn deletions(&self) -> usize {
        self.count(EditOp::Delete)
    }

    fn count(&self, op: EditOp) -> usize {
        self.0.iter().filter(|e| e.op == op).map(Edit::len).sum()
    }

    /// True when the script contains no insert or delete
    pub fn is_identity(&self) -> bool {
        self.0.iter().all(|e| e.op == EditOp::Equal)
    }

    /// Check the round-trip law against the inputs the script was computed from
    ///
    /// # Errors
    ///
    /// Returns `DiffError::Computation` naming the side that fails to reconstruct
    pub fn verify(&self, from: &str, to: &str) -> Result<()> {
        if self.from_text() != from {
            return Err(DiffError::Computation(
                "edit script does not reconstruct the from text".to_string(),
            ));
        }
        if self.to_text() != to {
            return Err(DiffError::Computation(
                "edit script does not reconstruct the to text".to_string(),
            ));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Compute a cleaned-up character edit script
///
/// Runs synchronously; the empty/equal cases short-circuit.
pub fn diff_chars(from: &str, to: &str) -> EditScript {
    if from == to {
        return if from.is_empty() {
            EditScript::default()
        } else {
            EditScript(vec![Edit::equal(from)])
        };
    }

    let prefix = common_prefix(from, to);
    let suffix = common_suffix(&from[prefix..], &to[prefix..]);

    let from_mid = &from[prefix..from.len() - suffix];
    let to_mid = &to[prefix..to.len() - suffix];

    let mut edits = Vec::new();
    if prefix > 0 {
        edits.push(Edit::equal(&from[..prefix]));
    }
    edits.extend(myers(from_mid, to_mid));
    if suffix > 0 {
        edits.push(Edit::equal(&from[from.len() - suffix..]));
    }

    EditScript(cleanup::cleanup_semantic(edits))
}

/// Raw Myers edits, coalesced into runs of the same operation
fn myers(from: &str, to: &str) -> Vec<Edit> {
    if from.is_empty() {
        return if to.is_empty() {
            Vec::new()
        } else {
            vec![Edit::insert(to)]
        };
    }
    if to.is_empty() {
        return vec![Edit::delete(from)];
    }

    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(from, to);

    let mut edits: Vec<Edit> = Vec::new();
    for change in diff.iter_all_changes() {
        let op = match change.tag() {
            ChangeTag::Equal => EditOp::Equal,
            ChangeTag::Insert => EditOp::Insert,
            ChangeTag::Delete => EditOp::Delete,
        };
        match edits.last_mut() {
            Some(last) if last.op == op => last.text.push_str(change.value()),
            _ => edits.push(Edit::new(op, change.value())),
        }
    }
    edits
}

/// Byte length of the common prefix, on a char boundary
fn common_prefix(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

/// Byte length of the common suffix, on a char boundary
fn common_suffix(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(ca, cb)| ca == cb)
        .map(|(ca, _)| ca.len_utf8())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(script: &EditScript) -> Vec<(EditOp, &str)> {
        script.iter().map(|e| (e.op, e.text.as_str())).collect()
    }

    #[test]
    fn test_insert_word() {
        let script = diff_chars("Hello world.", "Hello brave world.");
        assert_eq!(
            ops(&script),
            vec![
                (EditOp::Equal, "Hello "),
                (EditOp::Insert, "brave "),
                (EditOp::Equal, "world."),
            ]
        );
        assert_eq!(script.insertions(), 6);
        assert_eq!(script.deletions(), 0);
    }

    #[test]
    fn test_delete_word() {
        let script = diff_chars("The quick brown fox", "The brown fox");
        assert_eq!(script.to_text(), "The brown fox");
        assert_eq!(script.from_text(), "The quick brown fox");
        assert_eq!(script.deletions(), 6);
    }

    #[test]
    fn test_identical_and_empty() {
        assert!(diff_chars("", "").is_empty());
        let script = diff_chars("same", "same");
        assert_eq!(ops(&script), vec![(EditOp::Equal, "same")]);
        assert!(script.is_identity());
    }

    #[test]
    fn test_from_empty_and_to_empty() {
        assert_eq!(ops(&diff_chars("", "new")), vec![(EditOp::Insert, "new")]);
        assert_eq!(ops(&diff_chars("old", "")), vec![(EditOp::Delete, "old")]);
    }

    #[test]
    fn test_semantic_cleanup_avoids_char_soup() {
        // Raw Myers keeps the shared "o" and "s" as one-char equalities
        let script = diff_chars("I saw a mouse today", "I saw a sofas today");
        assert_eq!(
            ops(&script),
            vec![
                (EditOp::Equal, "I saw a "),
                (EditOp::Delete, "mouse"),
                (EditOp::Insert, "sofas"),
                (EditOp::Equal, " today"),
            ]
        );
    }

    #[test]
    fn test_word_replacement() {
        let script = diff_chars("The cat sat.", "The dog sat.");
        assert_eq!(
            ops(&script),
            vec![
                (EditOp::Equal, "The "),
                (EditOp::Delete, "cat"),
                (EditOp::Insert, "dog"),
                (EditOp::Equal, " sat."),
            ]
        );
    }

    #[test]
    fn test_round_trip_law() {
        let pairs = [
            ("", ""),
            ("abc", ""),
            ("", "abc"),
            ("kitten", "sitting"),
            (
                "Our product helps teams ship faster.",
                "Our new product helps small teams ship much faster!",
            ),
            ("naïve café", "naive cafe"),
            ("line one\nline two", "line one\nline 2\nline three"),
            ("日本語のテキスト", "日本語の新しいテキスト"),
        ];

        for (from, to) in pairs {
            let script = diff_chars(from, to);
            assert_eq!(script.from_text(), from, "from side of {:?}", (from, to));
            assert_eq!(script.to_text(), to, "to side of {:?}", (from, to));
            assert!(script.verify(from, to).is_ok());
        }
    }

    #[test]
    fn test_verify_detects_broken_script() {
        let script = EditScript::new(vec![Edit::equal("abc")]);
        assert!(matches!(
            script.verify("abc", "abd"),
            Err(DiffError::Computation(_))
        ));
    }

    #[test]
    fn test_common_prefix_suffix_char_boundaries() {
        assert_eq!(common_prefix("héllo", "hélp"), "hél".len());
        assert_eq!(common_suffix("añb", "cñb"), "ñb".len());
        assert_eq!(common_prefix("abc", "abc"), 3);
    }

    #[test]
    fn test_script_serializes_as_pairs() {
        let script = EditScript::new(vec![Edit::equal("a"), Edit::insert("b")]);
        let json = serde_json::to_value(&script).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"op": "equal", "text": "a"},
                {"op": "insert", "text": "b"}
            ])
        );
    }
}
