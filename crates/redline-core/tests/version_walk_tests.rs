//! Walking a press release through its four drafts

use redline_core::render::HtmlCompositor;
use redline_core::{Comparison, DiffConfig, VersionSet, VersionSlot, render};
use redline_testkit::fixtures::{DRAFT_V4, version_set_json};

fn versions() -> VersionSet {
    VersionSet::from_json(&version_set_json()).unwrap()
}

fn redline_html(versions: &VersionSet, from: usize, to: usize) -> String {
    match versions
        .compare(from, to, true, &DiffConfig::default())
        .unwrap()
    {
        Comparison::Redline(outcome) => {
            assert_eq!(outcome.label(), "AST diff");
            assert!(!outcome.stats.is_zero());
            HtmlCompositor::new().compose(&render(&outcome.result))
        }
        other => panic!("Expected a redline, got {:?}", other),
    }
}

#[test]
fn test_all_versions_load() {
    let versions = versions();
    assert_eq!(versions.available(), VersionSlot::ALL.to_vec());
    assert_eq!(versions.get(VersionSlot::Final), Some(DRAFT_V4));
}

#[test]
fn test_refined_draft_redline() {
    let html = redline_html(&versions(), 1, 2);

    assert!(html.starts_with(r#"<div class="redline">"#));
    assert!(html.contains(r#"<ins class="diff-added"><em>small </em></ins>"#), "{}", html);
    assert!(html.contains(r#"<li class="diff-added-block">"#), "{}", html);
    assert!(html.contains("Supplier reports"));
}

#[test]
fn test_headline_edit_stays_bold() {
    let html = redline_html(&versions(), 3, 4);
    assert!(
        html.contains(r#"<ins class="diff-added"><strong> for Small Retailers</strong></ins>"#),
        "{}",
        html
    );
}

#[test]
fn test_quote_added_in_validated_draft() {
    let html = redline_html(&versions(), 2, 3);
    assert!(
        html.contains(r#"<blockquote class="diff-added-block">"#),
        "{}",
        html
    );
    assert!(html.contains(r#"<del class="diff-removed">"#));
}

#[test]
fn test_toggle_off_shows_clean_text() {
    let comparison = versions()
        .compare(1, 4, false, &DiffConfig::default())
        .unwrap();
    assert!(matches!(comparison, Comparison::Clean(text) if text == DRAFT_V4));
}

#[test]
fn test_missing_versions_have_no_content() {
    let mut partial = VersionSet::new();
    partial.capture(VersionSlot::Draft, "# Draft").unwrap();

    let comparison = partial.compare(1, 2, true, &DiffConfig::default()).unwrap();
    assert!(matches!(comparison, Comparison::NoContent));
}
