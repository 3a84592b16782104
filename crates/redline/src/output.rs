//! Printing a comparison in the requested format

use crate::cli::Format;
use crate::context::Context;
use crate::terminal;
use anyhow::Result;
use colored::Colorize;
use redline_core::render::HtmlCompositor;
use redline_core::{Comparison, DiffOutcome, render};
use serde_json::json;
use std::io::{self, Write};

const NO_CONTENT: &str = "No content available for comparison";

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// Print a comparison
///
/// Diff failures never reach here as errors; only I/O can fail.
pub fn present(comparison: &Comparison, ctx: &Context, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let output = json!({
                "schema_version": "1.0",
                "comparison": comparison,
            });
            print_json(&serde_json::to_string_pretty(&output)?)?;
        }
        Format::Html => print_text(&html(comparison))?,
        Format::Text => text(comparison, ctx)?,
    }
    Ok(())
}

fn html(comparison: &Comparison) -> String {
    match comparison {
        Comparison::Redline(outcome) => HtmlCompositor::new().compose(&render(&outcome.result)),
        Comparison::Clean(text) => format!(
            r#"<div class="redline"><pre>{}</pre></div>"#,
            html_escape::encode_text(text)
        ),
        Comparison::NoContent => format!(r#"<div class="redline-empty">{}</div>"#, NO_CONTENT),
    }
}

fn text(comparison: &Comparison, ctx: &Context) -> io::Result<()> {
    match comparison {
        Comparison::Redline(outcome) => {
            print_text(&summary(outcome))?;
            if ctx.verbose {
                for failure in &outcome.failures {
                    eprintln!("{} {} stage: {}", "!".yellow(), failure.stage, failure.error);
                }
            }
            print_text("")?;
            print_text(&terminal::paint(&render(&outcome.result)))
        }
        Comparison::Clean(text) => print_text(text.trim_end()),
        Comparison::NoContent => print_text(&NO_CONTENT.dimmed().to_string()),
    }
}

/// Badge line: engine label plus change counts
fn summary(outcome: &DiffOutcome) -> String {
    format!(
        "{} {} {}",
        format!("[{}]", outcome.label()).cyan(),
        format!("+{}", outcome.stats.additions).green(),
        format!("-{}", outcome.stats.deletions).red()
    )
}
