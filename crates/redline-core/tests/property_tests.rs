//! Laws that hold for every input pair
//!
//! Table-driven over hand-picked edge cases and the press-release drafts.

use redline_core::chardiff::diff_chars;
use redline_core::config::Engine;
use redline_core::error::{DiffError, Result};
use redline_core::fallback::{CharFallback, DiffStage, FallbackChain, Stage, TerminalShape};
use redline_core::line_aware::ChangeKind;
use redline_core::merge::{DiffStatus, MergedNode};
use redline_core::{DiffConfig, DiffResult, diff_documents, render};
use redline_testkit::fixtures::DRAFTS;

const TEXT_PAIRS: &[(&str, &str)] = &[
    ("", ""),
    ("", "added"),
    ("removed", ""),
    ("same", "same"),
    ("kitten", "sitting"),
    ("The cat came.", "The dog came."),
    ("line one\nline two", "line one\nline 2\nline three"),
    ("naïve café", "naive cafe"),
    ("日本語のテキスト", "日本のテキスト"),
    ("**bold** text", "**bold** and more text"),
];

fn draft_pairs() -> Vec<(&'static str, &'static str)> {
    let mut pairs = Vec::new();
    for from in DRAFTS {
        for to in DRAFTS {
            pairs.push((from, to));
        }
    }
    pairs
}

#[test]
fn test_edit_scripts_round_trip() {
    let pairs = TEXT_PAIRS.iter().copied().chain(draft_pairs());
    for (from, to) in pairs {
        let script = diff_chars(from, to);
        assert_eq!(script.from_text(), from, "from side of {:?} -> {:?}", from, to);
        assert_eq!(script.to_text(), to, "to side of {:?} -> {:?}", from, to);
        assert!(script.verify(from, to).is_ok());
    }
}

fn assert_tags_propagate(node: &MergedNode) {
    if matches!(node.diff_status, DiffStatus::Added | DiffStatus::Removed) {
        node.walk(&mut |descendant| {
            assert_eq!(
                descendant.diff_status, node.diff_status,
                "{:?} under {:?}",
                descendant.node, node.node
            );
        });
        return;
    }
    for child in &node.children {
        assert_tags_propagate(child);
    }
}

#[test]
fn test_added_and_removed_tags_cover_subtrees() {
    for (from, to) in draft_pairs() {
        let outcome = diff_documents(from, to, &DiffConfig::default());
        let DiffResult::Structural { merged_tree } = &outcome.result else {
            panic!("Expected a structural result, got {:?}", outcome.result);
        };
        assert_tags_propagate(merged_tree);
    }
}

#[test]
fn test_self_diff_is_unchanged_for_every_engine() {
    for engine in [Engine::Structural, Engine::LineAware] {
        let config = DiffConfig {
            engine,
            ..DiffConfig::default()
        };
        for draft in DRAFTS {
            let outcome = diff_documents(draft, draft, &config);
            assert!(outcome.stats.is_zero(), "{:?}: {:?}", engine, outcome.stats);
            assert!(outcome.failures.is_empty());

            match &outcome.result {
                DiffResult::Structural { merged_tree } => merged_tree.walk(&mut |node| {
                    assert_eq!(node.diff_status, DiffStatus::Unchanged, "{:?}", node.node)
                }),
                DiffResult::LineAware { segments, .. } | DiffResult::CharOnly { segments } => {
                    assert!(segments.iter().all(|s| s.change == ChangeKind::Unchanged))
                }
            }
        }
    }
}

struct Broken(Stage);

impl DiffStage for Broken {
    fn stage(&self) -> Stage {
        self.0
    }

    fn run(&self, _from: &str, _to: &str) -> Result<DiffResult> {
        Err(DiffError::Computation("stage unavailable".to_string()))
    }
}

#[test]
fn test_chain_always_renders() {
    let chain = FallbackChain::with_stages(
        vec![
            Box::new(Broken(Stage::Structural)),
            Box::new(Broken(Stage::LineAware)),
        ],
        CharFallback::new(false, TerminalShape::CharOnly),
    );

    for (from, to) in TEXT_PAIRS.iter().copied().chain(draft_pairs()) {
        let outcome = chain.run(from, to);
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.label(), "Fallback mode (char diff)");
        assert!(matches!(outcome.result, DiffResult::CharOnly { .. }));

        let rendered = render(&outcome.result);
        assert_eq!(rendered.new_text(), to);
        assert_eq!(rendered.old_text(), from);
    }
}
