//! CLI output formatting for the build and check commands.
//!
//! # Information-First Display
//!
//! Documents are listed by title and positional index, with their source
//! path as an indented `Source:` line and any warnings beneath it. Progress
//! events print one line per thing that happened, in the order the stages
//! report them.
//!
//! # Output Format
//!
//! ## Build progress
//!
//! ```text
//! Found 4 documents
//! Converted Guides/Installation.md
//! Converted Reference/Glossary.md
//!     Warning: Comment - %% draft %%
//! Guides/Installation.md → guides/installation.mdx
//! Attachment 3f2a9c0e5b7d41e1.png
//! Navigation → meta.json
//! Warning: app/layout.config.jsx: no line containing "const GITHUB_LINK ="
//! Finalized
//! ```
//!
//! ## Summary
//!
//! ```text
//! Wrote 4 documents, 2 attachments (1 warning)
//! {"success":true,"stats":{"warn":1,"files":4,"attachments":2}}
//! ```
//!
//! ## Check
//!
//! ```text
//! Documents
//! 001 Tuning
//!     Source: Guides/Advanced/Tuning.md
//! 002 Glossary (1 warning)
//!     Source: Reference/Glossary.md
//!     Warning: Comment - %% draft %%
//!
//! Attachments
//!     3f2a9c0e5b7d41e1.png ← attachments/diagram.png
//!
//! 2 documents, 1 attachment, 1 warning
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::pipeline::{BuildEvent, BuildReport, BuildStats, CheckReport};
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 warning`, `2 documents`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Format a document header: positional index + title, with warning count.
///
/// ```text
/// 001 Installation
/// 002 Glossary (1 warning)
/// ```
fn document_header(index: usize, title: &str, warnings: usize) -> String {
    match warnings {
        0 => format!("{} {}", format_index(index), title),
        n => format!("{} {} ({})", format_index(index), title, count(n, "warning")),
    }
}

/// Display path relative to `root` when possible.
fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Build progress
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::ScanCompleted { documents } => {
            vec![format!("Found {}", count(*documents, "document"))]
        }
        BuildEvent::DocumentConverted { source, warnings } => {
            let mut lines = vec![format!("Converted {source}")];
            lines.extend(
                warnings
                    .iter()
                    .map(|w| format!("{}Warning: {w}", indent(1))),
            );
            lines
        }
        BuildEvent::DocumentWritten { source, output } => {
            vec![format!("{source} → {output}")]
        }
        BuildEvent::DocumentSkipped { source, reason } => {
            vec![format!("Skipped {source}: {reason}")]
        }
        BuildEvent::AttachmentCopied { public_name } => {
            vec![format!("Attachment {public_name}")]
        }
        BuildEvent::Warning(warning) => vec![format!("Warning: {warning}")],
        BuildEvent::MetadataWritten { path } => vec![format!("Navigation → {path}")],
        BuildEvent::Finalized => vec!["Finalized".to_string()],
    }
}

// ============================================================================
// Summary
// ============================================================================

#[derive(Serialize)]
struct JsonResult<'a> {
    success: bool,
    stats: &'a BuildStats,
}

/// One-line JSON result for scripts driving the build.
pub fn format_result_json(stats: &BuildStats) -> String {
    serde_json::to_string(&JsonResult {
        success: true,
        stats,
    })
    .unwrap_or_default()
}

/// Format the end-of-build summary: counts, then the JSON result.
pub fn format_build_summary(report: &BuildReport) -> Vec<String> {
    let stats = &report.stats;
    let mut headline = format!(
        "Wrote {}, {}",
        count(stats.documents, "document"),
        count(stats.attachments, "attachment")
    );
    if stats.warnings > 0 {
        headline.push_str(&format!(" ({})", count(stats.warnings, "warning")));
    }
    vec![headline, format_result_json(stats)]
}

/// Print the build summary to stdout.
pub fn print_build_summary(report: &BuildReport) {
    for line in format_build_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format a dry run: every document with its warnings, then attachments.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    let root = &report.tree.root;

    lines.push("Documents".to_string());
    for (i, doc) in report.processed.documents.iter().enumerate() {
        lines.push(document_header(i + 1, &doc.title, doc.warnings.len()));
        lines.push(format!("{}Source: {}", indent(1), doc.relative_path()));
        for warning in &doc.warnings {
            lines.push(format!("{}Warning: {}", indent(1), warning));
        }
    }

    if !report.processed.attachments.is_empty() {
        lines.push(String::new());
        lines.push("Attachments".to_string());
        for attachment in &report.processed.attachments {
            lines.push(format!(
                "{}{} ← {}",
                indent(1),
                attachment.public_name,
                relative_display(&attachment.source_path, root)
            ));
        }
    }

    let other: Vec<String> = report
        .tree
        .warnings
        .iter()
        .chain(
            report
                .processed
                .warnings
                .iter()
                .filter(|w| !is_document_warning(report, &w.context, &w.message)),
        )
        .map(|w| w.to_string())
        .collect();
    if !other.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        lines.extend(other.into_iter().map(|w| format!("{}{}", indent(1), w)));
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}, {}",
        count(report.processed.documents.len(), "document"),
        count(report.processed.attachments.len(), "attachment"),
        count(report.warnings().len(), "warning")
    ));
    lines
}

/// Whether a warning is already shown under its document.
fn is_document_warning(report: &CheckReport, context: &str, message: &str) -> bool {
    report
        .processed
        .documents
        .iter()
        .any(|d| d.relative_path() == context && d.warnings.iter().any(|w| w == message))
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
