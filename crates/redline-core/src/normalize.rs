//! Content normalization applied before line-aware and char diffing
//!
//! Generated drafts carry noise that is not part of the document: assistant
//! meta-commentary ("Here is the revised draft:"), bold labels split from
//! their colon, FAQ answers drifting away from their question, runs of blank
//! lines. Removing it keeps the fallback redlines focused on real edits.
//! The structural engine diffs its input as-is.

use regex::Regex;
use std::sync::LazyLock;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("valid normalization pattern"),
        replacement,
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        // "**Label**\n\n:" → "**Label**:"
        rule(r"(?m)^(\*\*[^*\n]+\*\*)[ \t]*\n+:[ \t]*$", "${1}:"),
        // Meta-commentary openers
        rule(r"(?im)^(?:Here's|Here is|I've created|Below is)[^\n]*$", ""),
        rule(r"(?im)^(?:This document|The following|Let me know if)[^\n]*$", ""),
        // Heading ending in a colon keeps its content on the next line
        rule(r"(?m)^(#{1,6}[ \t]+[^\n]*:)[ \t]*\n{2,}", "${1}\n"),
        // "**Label:**" followed by blank lines
        rule(r"(?m)^(\*\*[^*\n]+:\*\*)[ \t]*\n{2,}", "${1}\n"),
        // "**Label**\n: value" → "**Label**: value"
        rule(r"(?m)^(\*\*[^*\n]+\*\*)[ \t]*\n+:[ \t]*", "${1}: "),
        // FAQ question text pushed onto the next line
        rule(
            r"(?m)^(\d+\.[ \t]+\*\*Question:\*\*)[ \t]*\n+([^#*\n])",
            "${1} ${2}",
        ),
        // FAQ answer indented under its question
        rule(
            r"(?m)^(\d+\.[ \t]+\*\*Question:\*\*[^\n]+)\n[ \t]+(\*\*Answer:\*\*)",
            "${1}\n${2}",
        ),
        // Bold lead-in separated from its lower-case continuation
        rule(r"(\*\*[^*\n]+\*\*)[ \t]*\n+[ \t]*([a-z])", "${1} ${2}"),
        // Runs of blank (or whitespace-only) lines, including those left by removed commentary
        rule(r"\n(?:[ \t]*\n){2,}", "\n\n"),
    ]
});

/// Normalize generated markdown
///
/// Idempotent: normalizing twice gives the same text as normalizing once.
pub fn normalize_content(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n");
    for rule in RULES.iter() {
        out = rule
            .pattern
            .replace_all(&out, rule.replacement)
            .into_owned();
    }
    out.trim().to_string()
}
