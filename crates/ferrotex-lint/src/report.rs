//! Human-readable rendering of scan results.

use crate::issue::Issue;
use crate::repair::Change;
use std::fmt::Write;

const RULE_WIDTH: usize = 50;

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// One issue per line, or a single line saying nothing was found.
pub fn render_issues(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No obvious structural issues found.\n".to_string();
    }
    let mut out = format!("Found {}:\n", plural(issues.len(), "potential issue"));
    for issue in issues {
        let _ = writeln!(out, "  • {issue}");
    }
    out
}

pub fn render_issues_json(issues: &[Issue]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(issues)
}

/// Numbered list of the edits made by the repair pass.
pub fn render_changes(changes: &[Change]) -> String {
    if changes.is_empty() {
        return "No obvious list structure issues found.\n".to_string();
    }
    changes
        .iter()
        .enumerate()
        .fold(String::new(), |mut out, (i, change)| {
            let _ = writeln!(out, "{}. {change}", i + 1);
            out
        })
}

/// Dumps the lines `target - radius ..= target + radius` (1-based, clamped to
/// the document) with the target line marked by `>>>`.
pub fn render_context<S: AsRef<str>>(lines: &[S], target: usize, radius: usize) -> String {
    let mut out = format!("Context around line {target}:\n{}\n", "=".repeat(RULE_WIDTH));
    if lines.is_empty() {
        return out;
    }
    let first = target.saturating_sub(radius).max(1);
    let last = target.saturating_add(radius).min(lines.len());
    for line_no in first..=last {
        let text = lines[line_no - 1].as_ref().trim_end();
        let marker = if line_no == target { ">>> " } else { "    " };
        let _ = writeln!(out, "{marker}{line_no:>3}: {text}");
    }
    out
}
