//! Output formatting for query results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::record::MatchResult;

/// JSON report structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub directory: String,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<String>,
    pub results: Vec<MatchResult>,
}

/// Write results in JSON format.
pub fn write_json<W: Write>(
    out: &mut W,
    directory: &str,
    pattern: &str,
    packages: &[String],
    results: &[MatchResult],
) -> anyhow::Result<()> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        directory: directory.to_string(),
        pattern: pattern.to_string(),
        packages: packages.to_vec(),
        results: results.to_vec(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// Write results in human-readable format.
pub fn write_pretty<W: Write>(out: &mut W, results: &[MatchResult]) -> anyhow::Result<()> {
    if results.is_empty() {
        writeln!(out, "{}", "no matching declarations".dimmed())?;
        return Ok(());
    }

    for result in results {
        let kind = if result.kind.as_str().is_empty() {
            "-".to_string()
        } else {
            result.kind.to_string()
        };
        writeln!(out, "{} {}", kind.cyan(), result.name.bold())?;
        write_comments(out, "  ", &result.comments)?;

        for field in &result.fields {
            writeln!(out, "  {} {}", field.name, field.type_name.dimmed())?;
            write_comments(out, "    ", &field.comments)?;
        }
        writeln!(out, "{}", "-".repeat(36).dimmed())?;
    }

    writeln!(out, "{} match(es)", results.len())?;
    Ok(())
}

/// Write results to stdout in the given format ("pretty" or "json").
pub fn write_results(
    format: &str,
    directory: &str,
    pattern: &str,
    packages: &[String],
    results: &[MatchResult],
) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        "json" => write_json(&mut out, directory, pattern, packages, results),
        _ => write_pretty(&mut out, results),
    }
}

fn write_comments<W: Write>(out: &mut W, indent: &str, comments: &str) -> anyhow::Result<()> {
    for line in comments.lines() {
        writeln!(out, "{}{}", indent, format!("// {}", line).green())?;
    }
    Ok(())
}
