//! Diff command - redline between two markdown files

use crate::cli::ViewArgs;
use crate::context::{Context, read_document};
use crate::output;
use anyhow::Result;
use redline_core::compare_texts;
use std::path::Path;

/// Compare two documents
///
/// # Exit Code
///
/// Exits non-zero only when a file or the config cannot be read. Diff
/// problems are absorbed by the fallback chain.
pub fn run(from: &Path, to: &Path, view: &ViewArgs, verbose: bool) -> Result<()> {
    let ctx = Context::new(view, verbose)?;
    let from_text = read_document(from)?;
    let to_text = read_document(to)?;

    let comparison = compare_texts(&from_text, &to_text, ctx.show_redlines, &ctx.config);
    output::present(&comparison, &ctx, view.format)
}

