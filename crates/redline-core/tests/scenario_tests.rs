//! End-to-end scenarios for the diff chain and renderer

use redline_core::chardiff::{Edit, EditScript};
use redline_core::fallback::Stage;
use redline_core::markdown::NodeType;
use redline_core::merge::{DiffStatus, MergedNode};
use redline_core::render::{Mark, RenderNode};
use redline_core::{DiffConfig, DiffResult, compute_diff, diff_documents, render};

fn merged_tree(result: &DiffResult) -> &MergedNode {
    match result {
        DiffResult::Structural { merged_tree } => merged_tree,
        other => panic!("Expected a structural result, got {:?}", other),
    }
}

fn assert_uniform(node: &MergedNode, status: DiffStatus) {
    node.walk(&mut |n| assert_eq!(n.diff_status, status, "{:?}", n.node));
}

#[test]
fn test_inserted_word_is_inline_edit() {
    let outcome = diff_documents(
        "# Title\n\nHello world.",
        "# Title\n\nHello brave world.",
        &DiffConfig::default(),
    );
    let tree = merged_tree(&outcome.result);

    let heading = &tree.children[0];
    assert_eq!(heading.node, NodeType::Heading { depth: 1 });
    assert_uniform(heading, DiffStatus::Unchanged);

    let para = &tree.children[1];
    assert_eq!(para.diff_status, DiffStatus::Changed);
    assert_eq!(
        para.char_diff,
        Some(EditScript::new(vec![
            Edit::equal("Hello "),
            Edit::insert("brave "),
            Edit::equal("world."),
        ]))
    );
    assert_eq!(outcome.stats.additions, 6);
    assert_eq!(outcome.stats.deletions, 0);
}

#[test]
fn test_appended_list_item_is_added() {
    let result = compute_diff("- Item A\n- Item B", "- Item A\n- Item B\n- Item C");
    let list = &merged_tree(&result).children[0];

    assert_eq!(list.diff_status, DiffStatus::Changed);
    assert_uniform(&list.children[0], DiffStatus::Unchanged);
    assert_uniform(&list.children[1], DiffStatus::Unchanged);

    let item_c = &list.children[2];
    assert_eq!(item_c.text(), "Item C");
    assert_uniform(item_c, DiffStatus::Added);
}

#[test]
fn test_removed_paragraph_is_struck_through() {
    let result = compute_diff("Paragraph one.", "");
    let tree = merged_tree(&result);

    assert_eq!(tree.diff_status, DiffStatus::Changed);
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].diff_status, DiffStatus::Removed);
    assert_eq!(
        tree.children[0].original_value.as_deref(),
        Some("Paragraph one.")
    );

    let rendered = render(&result);
    assert_eq!(rendered.text_marked(&[Mark::Deleted]), "Paragraph one.");
    assert_eq!(rendered.new_text(), "");
}

#[test]
fn test_parser_failure_falls_back() {
    let mut config = DiffConfig::default();
    config.parser.max_depth = 2;

    let from = "> > > A quote nested too deep.";
    let to = "> > > A quote nested far too deep.";
    let outcome = diff_documents(from, to, &config);

    assert!(outcome.used_fallback());
    assert_eq!(outcome.failures[0].stage, Stage::Structural);
    assert!(
        matches!(
            outcome.result,
            DiffResult::LineAware { .. } | DiffResult::CharOnly { .. }
        ),
        "{:?}",
        outcome.result
    );

    let rendered = render(&outcome.result);
    assert!(rendered.new_text().contains("far too deep"));
    assert!(!rendered.children().is_empty());
}

#[test]
fn test_pathologically_nested_quote_degrades_to_line_aware() {
    let nesting = "> ".repeat(20_000);
    let from = format!("{}deep", nesting);
    let to = format!("{}very deep", nesting);
    let outcome = diff_documents(&from, &to, &DiffConfig::default());

    assert!(
        matches!(
            outcome.result,
            DiffResult::LineAware {
                used_fallback: false,
                ..
            }
        ),
        "{:?}",
        outcome.failures
    );
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].stage, Stage::Structural);
    assert!(
        outcome.failures[0]
            .error
            .to_string()
            .starts_with("PARSE_ERROR")
    );
    assert!(render(&outcome.result).new_text().ends_with("very deep"));
}

#[test]
fn test_long_paragraph_with_one_word_changed_is_common() {
    let from = "Acme today announced Beacon, a demand forecasting tool that helps small \
                retail teams plan weekly stock levels, spot slow-moving products early, and \
                share clear reorder suggestions with every supplier they work with.";
    let to = from.replace("weekly", "monthly");
    assert!(from.chars().count() >= 200);

    let result = compute_diff(from, &to);
    let tree = merged_tree(&result);

    assert_eq!(tree.children.len(), 1);
    let para = &tree.children[0];
    assert_eq!(para.diff_status, DiffStatus::Changed);

    let script = para.char_diff.as_ref().unwrap();
    assert_eq!(script.from_text(), from);
    assert_eq!(script.to_text(), to);
    assert!(script.insertions() <= "monthly".len());
}

#[test]
fn test_partially_bold_sentence_keeps_bold_after_edit() {
    let from = "Beacon gives **every store manager** a clear weekly plan for stock and staffing.";
    let to = "Beacon gives **every busy store manager** a clear weekly plan for stock and staffing.";
    let rendered = render(&compute_diff(from, to));

    let mut bold_insert = false;
    rendered.walk(&mut |node| {
        if let RenderNode::Span {
            text,
            mark: Mark::Inserted,
            strong: true,
            ..
        } = node
            && text.contains("busy")
        {
            bold_insert = true;
        }
    });
    assert!(bold_insert, "{:#?}", rendered);
    assert_eq!(rendered.new_text(), to.replace("**", ""));
    assert_eq!(rendered.old_text(), from.replace("**", ""));
}
