//! Human-readable run report.
//!
//! Each changed file gets a status header, optionally followed by a
//! unified-style diff of the affected lines. Per-file errors are rendered
//! separately so the driver can send them to stderr. Rendering returns
//! strings; color follows the global `colored` setting.

use crate::error::FileError;
use crate::recorder::{DiffRecorder, FileRecord, Mode};
use crate::rewriter::split_terminator;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

/// Unchanged lines shown around each change.
pub const CONTEXT_LINES: usize = 1;

/// Renders headers (and diffs when `show_changes`) for every changed file.
///
/// Returns an empty string when nothing changed.
pub fn render_changes(recorder: &DiffRecorder, show_changes: bool) -> String {
    let mut out = String::new();
    if !recorder.has_changes() {
        return out;
    }

    for record in recorder.changes() {
        out.push_str(&format!(
            "{} {}\n",
            status(record, recorder.mode()),
            record.path.display()
        ));
        if show_changes {
            out.push_str(&render_diff(record, CONTEXT_LINES));
        }
    }

    if recorder.mode() == Mode::Check {
        out.push_str(&format!(
            "\n{} run without --check to apply fixes\n",
            "hint:".cyan().bold()
        ));
    }
    out
}

fn status(record: &FileRecord, mode: Mode) -> colored::ColoredString {
    match mode {
        Mode::Check => "Would fix:".yellow().bold(),
        Mode::Fix if record.write_failed => "Failed to fix:".red().bold(),
        Mode::Fix => "Fixed:".green().bold(),
    }
}

/// Renders the hunks between a record's original and fixed lines.
///
/// Lines are indented by two spaces and printed without terminators.
pub fn render_diff(record: &FileRecord, context: usize) -> String {
    let old = record.original_text();
    let new = record.fixed_text();
    let diff = TextDiff::from_lines(old.as_str(), new.as_str());

    let mut out = String::new();
    for group in diff.grouped_ops(context) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_start = first.old_range().start;
        let old_len = last.old_range().end - old_start;
        let new_start = first.new_range().start;
        let new_len = last.new_range().end - new_start;
        let header = format!(
            "@@ -{},{} +{},{} @@",
            old_start + 1,
            old_len,
            new_start + 1,
            new_len
        );
        out.push_str(&format!("  {}\n", header.cyan()));

        for op in &group {
            for change in diff.iter_changes(op) {
                let (line, _) = split_terminator(change.value());
                let rendered = match change.tag() {
                    ChangeTag::Equal => format!(" {line}").normal(),
                    ChangeTag::Delete => format!("-{line}").red(),
                    ChangeTag::Insert => format!("+{line}").green(),
                };
                out.push_str(&format!("  {rendered}\n"));
            }
        }
    }
    out
}

/// One `error: <path>: <reason>` line per error.
pub fn render_errors(errors: &[FileError]) -> String {
    let mut out = String::new();
    for err in errors {
        out.push_str(&format!("{} {}\n", "error:".red().bold(), err));
    }
    out
}

/// Counts for verbose output.
pub fn render_summary(recorder: &DiffRecorder) -> String {
    let verb = match recorder.mode() {
        Mode::Fix => "changed",
        Mode::Check => "need changes",
    };
    format!(
        "{} checked {} file(s): {} {}, {} error(s)",
        "info:".blue().bold(),
        recorder.files_checked(),
        recorder.changes().len(),
        verb,
        recorder.errors().len()
    )
}
