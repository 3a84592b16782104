//! Structural diff merger
//!
//! Walks two document trees level by level: siblings are aligned with the
//! [`Aligner`], added and removed subtrees are tagged uniformly, and matched
//! nodes either recurse (identical text) or carry a character edit script
//! over their flattened text (changed text). Lists never get a flat script;
//! their items are merged individually instead.
//!
//! Short paragraphs only align on exact text, so a one-word edit to a short
//! line would otherwise surface as delete + insert. When replacement pairing
//! is on, a removed and an added sibling inside the same alignment gap that
//! resemble each other are merged as one changed node.

use crate::align::{Aligner, AlignmentMatch, FuzzyMatcher, MatchStatus, NodeMatcher};
use crate::chardiff::{EditScript, diff_chars};
use crate::config::DiffConfig;
use crate::error::{DiffError, Result};
use crate::markdown::{DocumentNode, NodeType};
use serde::{Deserialize, Serialize};

/// Per-node diff tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Unchanged,
    Added,
    Removed,
    Changed,
}

/// Node of the merged tree
///
/// Built fresh from the two inputs; neither input tree is modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedNode {
    #[serde(flatten)]
    pub node: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub diff_status: DiffStatus,
    /// Only on `changed` text-bearing nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_diff: Option<EditScript>,
    /// Flattened "from" text of removed and changed nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MergedNode>,
}

impl MergedNode {
    /// Copy a subtree, tagging every node with the same status
    pub fn tagged(node: &DocumentNode, status: DiffStatus) -> Self {
        Self {
            node: node.node_type(),
            value: node.value().map(str::to_string),
            diff_status: status,
            char_diff: None,
            original_value: (status == DiffStatus::Removed).then(|| node.text()),
            children: node
                .children()
                .iter()
                .map(|child| Self::tagged(child, status))
                .collect(),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.diff_status == DiffStatus::Unchanged
    }

    /// Flattened text of the subtree as stored (the "to" text for common nodes)
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(value) = &self.value {
            out.push_str(value);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Visit the node and all descendants, depth first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a MergedNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Recursive tree merger
#[derive(Debug, Clone)]
pub struct DiffMerger<M: NodeMatcher = FuzzyMatcher> {
    aligner: Aligner,
    matcher: M,
    pair_replacements: bool,
}

impl Default for DiffMerger<FuzzyMatcher> {
    fn default() -> Self {
        Self::new(&DiffConfig::default())
    }
}

impl DiffMerger<FuzzyMatcher> {
    pub fn new(config: &DiffConfig) -> Self {
        Self {
            aligner: Aligner::new(&config.alignment),
            matcher: FuzzyMatcher::new(&config.similarity),
            pair_replacements: config.similarity.pair_replacements,
        }
    }
}

impl<M: NodeMatcher> DiffMerger<M> {
    pub fn with_matcher(aligner: Aligner, matcher: M, pair_replacements: bool) -> Self {
        Self {
            aligner,
            matcher,
            pair_replacements,
        }
    }

    /// Merge two parsed documents into one annotated tree
    ///
    /// # Errors
    ///
    /// - `Alignment` if a sibling level is too large to align
    /// - `Computation` if an edit script breaks the round-trip law
    pub fn merge(&self, from: &DocumentNode, to: &DocumentNode) -> Result<MergedNode> {
        self.merge_common(from, to)
    }

    fn merge_common(&self, from: &DocumentNode, to: &DocumentNode) -> Result<MergedNode> {
        let same_header = from.node_type() == to.node_type();

        // Containers recurse regardless of text
        if matches!(to, DocumentNode::Root(_) | DocumentNode::List { .. }) {
            let children = self.merge_siblings(from.children(), to.children())?;
            let settled = children.iter().all(MergedNode::is_unchanged)
                && from.children().len() == to.children().len();
            let status = if same_header && settled {
                DiffStatus::Unchanged
            } else {
                DiffStatus::Changed
            };
            return Ok(shell(to, status, children));
        }

        let from_text = from.text();
        let to_text = to.text();
        let same_text =
            from_text == to_text || (from_text.trim().is_empty() && to_text.trim().is_empty());

        if same_text {
            let children = self.merge_siblings(from.children(), to.children())?;
            let status = if same_header
                && from.value() == to.value()
                && children.iter().all(MergedNode::is_unchanged)
            {
                DiffStatus::Unchanged
            } else {
                DiffStatus::Changed
            };
            return Ok(shell(to, status, children));
        }

        let script = diff_chars(&from_text, &to_text);
        script.verify(&from_text, &to_text)?;

        let children = to
            .children()
            .iter()
            .map(|child| MergedNode::tagged(child, DiffStatus::Unchanged))
            .collect();

        let mut merged = shell(to, DiffStatus::Changed, children);
        merged.char_diff = Some(script);
        merged.original_value = Some(from_text);
        Ok(merged)
    }

    fn merge_siblings(&self, from: &[DocumentNode], to: &[DocumentNode]) -> Result<Vec<MergedNode>> {
        let mut matches = self
            .aligner
            .align(from, to, |a, b| self.matcher.matches(a, b))?;

        if self.pair_replacements {
            matches = self.pair_gaps(from, to, matches);
        }

        matches
            .into_iter()
            .map(|m| match (m.from, m.to) {
                (Some(i), Some(j)) => self.merge_common(&from[i], &to[j]),
                (None, Some(j)) => Ok(MergedNode::tagged(&to[j], DiffStatus::Added)),
                (Some(i), None) => Ok(MergedNode::tagged(&from[i], DiffStatus::Removed)),
                (None, None) => Err(DiffError::Alignment(
                    "alignment entry without either side".to_string(),
                )),
            })
            .collect()
    }

    /// Rewrite each gap between common matches, pairing look-alike removed/added siblings
    fn pair_gaps(
        &self,
        from: &[DocumentNode],
        to: &[DocumentNode],
        matches: Vec<AlignmentMatch>,
    ) -> Vec<AlignmentMatch> {
        let mut out = Vec::with_capacity(matches.len());
        let mut gap: Vec<AlignmentMatch> = Vec::new();

        for m in matches {
            if m.status == MatchStatus::Common {
                out.extend(self.pair_gap(from, to, std::mem::take(&mut gap)));
                out.push(m);
            } else {
                gap.push(m);
            }
        }
        out.extend(self.pair_gap(from, to, gap));
        out
    }

    fn pair_gap(
        &self,
        from: &[DocumentNode],
        to: &[DocumentNode],
        gap: Vec<AlignmentMatch>,
    ) -> Vec<AlignmentMatch> {
        let removed: Vec<usize> = gap
            .iter()
            .filter(|m| m.status == MatchStatus::Removed)
            .filter_map(|m| m.from)
            .collect();
        let added: Vec<usize> = gap
            .iter()
            .filter(|m| m.status == MatchStatus::Added)
            .filter_map(|m| m.to)
            .collect();
        if removed.is_empty() || added.is_empty() {
            return gap;
        }

        // Greedy, order-preserving on both sides
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        let mut next_removed = 0;
        for &j in &added {
            if let Some(offset) = removed[next_removed..]
                .iter()
                .position(|&i| self.matcher.resembles(&from[i], &to[j]))
            {
                let i = removed[next_removed + offset];
                pairs.push((i, j));
                next_removed += offset + 1;
            }
        }
        if pairs.is_empty() {
            return gap;
        }

        let mut out = Vec::with_capacity(gap.len());
        let mut removed_iter = removed.into_iter().peekable();
        let mut added_iter = added.into_iter().peekable();
        for (i, j) in pairs {
            while let Some(r) = removed_iter.next_if(|&r| r < i) {
                out.push(AlignmentMatch::removed(r));
            }
            while let Some(a) = added_iter.next_if(|&a| a < j) {
                out.push(AlignmentMatch::added(a));
            }
            removed_iter.next();
            added_iter.next();
            out.push(AlignmentMatch::common(i, j));
        }
        out.extend(removed_iter.map(AlignmentMatch::removed));
        out.extend(added_iter.map(AlignmentMatch::added));
        out
    }
}

/// Merged node for `to` with already merged children
fn shell(to: &DocumentNode, status: DiffStatus, children: Vec<MergedNode>) -> MergedNode {
    MergedNode {
        node: to.node_type(),
        value: to.value().map(str::to_string),
        diff_status: status,
        char_diff: None,
        original_value: None,
        children,
    }
}

/// Merge two trees with default settings
pub fn merge(from: &DocumentNode, to: &DocumentNode) -> Result<MergedNode> {
    DiffMerger::default().merge(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chardiff::Edit;
    use crate::config::AlignmentConfig;
    use crate::markdown::parse;

    fn merged(from: &str, to: &str) -> MergedNode {
        merge(&parse(from).unwrap(), &parse(to).unwrap()).unwrap()
    }

    fn assert_uniform(node: &MergedNode, status: DiffStatus) {
        node.walk(&mut |n| assert_eq!(n.diff_status, status, "{:?}", n.node));
    }

    #[test]
    fn test_identical_documents_are_unchanged() {
        let text = "# Launch\n\nAcme ships **today**.\n\n- fast\n- cheap";
        let tree = merged(text, text);
        assert_uniform(&tree, DiffStatus::Unchanged);
    }

    #[test]
    fn test_inserted_word_in_paragraph() {
        let tree = merged("# Title\n\nHello world.", "# Title\n\nHello brave world.");

        assert_eq!(tree.diff_status, DiffStatus::Changed);
        assert_uniform(&tree.children[0], DiffStatus::Unchanged);

        let para = &tree.children[1];
        assert_eq!(para.diff_status, DiffStatus::Changed);
        assert_eq!(para.original_value.as_deref(), Some("Hello world."));
        assert_eq!(
            para.char_diff.as_ref().unwrap().edits(),
            &[
                Edit::equal("Hello "),
                Edit::insert("brave "),
                Edit::equal("world."),
            ]
        );
    }

    #[test]
    fn test_without_pairing_short_edit_is_replacement() {
        let config = DiffConfig::default();
        let merger = DiffMerger::with_matcher(
            Aligner::new(&config.alignment),
            FuzzyMatcher::new(&config.similarity),
            false,
        );
        let tree = merger
            .merge(&parse("Hello world.").unwrap(), &parse("Hello brave world.").unwrap())
            .unwrap();

        let statuses: Vec<DiffStatus> = tree.children.iter().map(|c| c.diff_status).collect();
        assert_eq!(statuses, vec![DiffStatus::Removed, DiffStatus::Added]);
    }

    #[test]
    fn test_added_list_item() {
        let tree = merged("- Item A\n- Item B", "- Item A\n- Item B\n- Item C");
        let list = &tree.children[0];

        assert_eq!(list.diff_status, DiffStatus::Changed);
        assert!(list.char_diff.is_none());
        assert_uniform(&list.children[0], DiffStatus::Unchanged);
        assert_uniform(&list.children[1], DiffStatus::Unchanged);
        assert_uniform(&list.children[2], DiffStatus::Added);
        assert_eq!(list.children[2].text(), "Item C");
    }

    #[test]
    fn test_removed_paragraph_keeps_original() {
        let tree = merged("Paragraph one.", "");

        assert_eq!(tree.diff_status, DiffStatus::Changed);
        assert_eq!(tree.children.len(), 1);
        let para = &tree.children[0];
        assert_uniform(para, DiffStatus::Removed);
        assert_eq!(para.original_value.as_deref(), Some("Paragraph one."));
    }

    #[test]
    fn test_unrelated_paragraphs_stay_separate() {
        let tree = merged("Hello world.", "Goodbye moon.");
        let statuses: Vec<DiffStatus> = tree.children.iter().map(|c| c.diff_status).collect();
        assert_eq!(statuses, vec![DiffStatus::Removed, DiffStatus::Added]);
    }

    #[test]
    fn test_changed_list_item_gets_script() {
        let tree = merged("- Item A\n- Item B", "- Item A\n- Item C");
        let list = &tree.children[0];
        let item = &list.children[1];

        assert_eq!(item.diff_status, DiffStatus::Changed);
        let script = item.char_diff.as_ref().unwrap();
        assert_eq!(script.from_text(), "Item B");
        assert_eq!(script.to_text(), "Item C");
    }

    #[test]
    fn test_formatting_only_change() {
        let tree = merged("Acme ships today.", "Acme ships **today**.");
        let para = &tree.children[0];

        assert_eq!(para.diff_status, DiffStatus::Changed);
        assert!(para.char_diff.is_none());
        assert!(
            para.children
                .iter()
                .any(|c| c.diff_status == DiffStatus::Added && c.node == NodeType::Strong)
        );
    }

    #[test]
    fn test_heading_level_change() {
        let tree = merged("# Launch", "## Launch");
        let heading = &tree.children[0];
        assert_eq!(heading.diff_status, DiffStatus::Changed);
        assert_eq!(heading.node, NodeType::Heading { depth: 2 });
    }

    #[test]
    fn test_empty_blocks_are_unchanged() {
        let tree = merged("---", "***");
        assert_uniform(&tree, DiffStatus::Unchanged);
    }

    #[test]
    fn test_pairing_keeps_document_order() {
        let tree = merged(
            "Intro.\n\nOld closing line.\n\nBye.",
            "Intro.\n\nBrand new section.\n\nOld closing lines.\n\nBye.",
        );
        let statuses: Vec<DiffStatus> = tree.children.iter().map(|c| c.diff_status).collect();
        assert_eq!(
            statuses,
            vec![
                DiffStatus::Unchanged,
                DiffStatus::Added,
                DiffStatus::Changed,
                DiffStatus::Unchanged,
            ]
        );
    }

    #[test]
    fn test_alignment_limit_is_reported() {
        let config = DiffConfig {
            alignment: AlignmentConfig { max_cells: 2 },
            ..DiffConfig::default()
        };
        let err = DiffMerger::new(&config)
            .merge(&parse("a\n\nb").unwrap(), &parse("a\n\nb").unwrap())
            .unwrap_err();
        assert!(matches!(err, DiffError::Alignment(_)));
    }

    #[test]
    fn test_serializes_like_mdast() {
        let tree = merged("Hello world.", "Hello brave world.");
        let json = serde_json::to_value(&tree.children[0]).unwrap();

        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["diffStatus"], "changed");
        assert_eq!(json["originalValue"], "Hello world.");
        assert_eq!(json["charDiff"][1]["op"], "insert");
        assert_eq!(json["charDiff"][1]["text"], "brave ");
        assert_eq!(json["children"][0]["type"], "text");
    }
}
