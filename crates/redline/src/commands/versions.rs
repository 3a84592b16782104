//! Versions command - redline between two drafts of a version set

use crate::cli::{Format, ViewArgs};
use crate::context::{Context, read_document};
use crate::output;
use anyhow::{Result, anyhow};
use colored::Colorize;
use redline_core::{VersionSet, VersionSlot};
use serde_json::json;
use std::path::Path;

/// Compare versions `from` and `to` (1-based) of a version-set file
pub fn run(
    file: &Path,
    from: usize,
    to: usize,
    list: bool,
    view: &ViewArgs,
    verbose: bool,
) -> Result<()> {
    let ctx = Context::new(view, verbose)?;
    let versions = VersionSet::from_json(&read_document(file)?)
        .map_err(|e| anyhow!("{}: {}", file.display(), e))?;

    if list {
        return render_list(&versions, view.format);
    }

    let comparison = versions.compare(from, to, ctx.show_redlines, &ctx.config)?;
    if view.format == Format::Text {
        output::print_text(&format!(
            "{} {} → {}",
            "→".cyan(),
            slot_title(from),
            slot_title(to)
        ))?;
    }
    output::present(&comparison, &ctx, view.format)
}

fn slot_title(number: usize) -> String {
    VersionSlot::from_number(number)
        .map(|slot| format!("v{} {}", slot.number(), slot.label()))
        .unwrap_or_else(|_| format!("v{}", number))
}

fn render_list(versions: &VersionSet, format: Format) -> Result<()> {
    if format == Format::Json {
        let entries: Vec<_> = VersionSlot::ALL
            .into_iter()
            .map(|slot| {
                json!({
                    "number": slot.number(),
                    "key": slot.key(),
                    "label": slot.label(),
                    "captured": versions.get(slot).is_some(),
                })
            })
            .collect();
        output::print_json(&serde_json::to_string_pretty(&json!({ "versions": entries }))?)?;
        return Ok(());
    }

    for slot in VersionSlot::ALL {
        let icon = if versions.get(slot).is_some() {
            "✓".green()
        } else {
            "·".dimmed()
        };
        output::print_text(&format!("{} {}. {} ({})", icon, slot.number(), slot.label(), slot.key()))?;
    }
    Ok(())
}
