//! Inserts missing `\item` markers.
//!
//! Repair is driven entirely by the scanner: every line reported as a
//! repairable [`Issue`] gets `\item ` in front of its text, keeping the
//! original indentation and line terminator. All other lines are copied
//! byte for byte.

use crate::issue::{Issue, IssueKind};
use crate::rules::ListRules;
use crate::scanner::EnvironmentScanner;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const ITEM_PREFIX: &str = "\\item ";

/// One rewritten line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub line: usize,
    pub before: String,
    pub after: String,
    /// Shortened text of the original line, for reports.
    pub snippet: String,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Added \\item to line {}: {}...", self.line, self.snippet)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// The repaired document.
    pub text: String,
    pub changes: Vec<Change>,
    /// Everything the scan found, including findings repair cannot fix.
    pub issues: Vec<Issue>,
}

impl RepairOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Repairs `text` under `rules`. The input is not modified.
pub fn repair(text: &str, rules: &ListRules) -> RepairOutcome {
    let issues = EnvironmentScanner::new(rules.clone()).scan_text(text);

    let targets: BTreeMap<usize, &str> = issues
        .iter()
        .filter_map(|issue| match &issue.kind {
            IssueKind::MissingItem { snippet, .. }
            | IssueKind::ContentBeforeFirstItem { snippet, .. } => {
                Some((issue.line, snippet.as_str()))
            }
            _ => None,
        })
        .collect();

    let mut changes = Vec::with_capacity(targets.len());
    let mut lines = Vec::new();

    for (idx, raw) in text.split('\n').enumerate() {
        let line_no = idx + 1;
        let Some(snippet) = targets.get(&line_no) else {
            lines.push(raw.to_string());
            continue;
        };

        let (body, terminator) = match raw.strip_suffix('\r') {
            Some(body) => (body, "\r"),
            None => (raw, ""),
        };
        let indent = &body[..body.len() - body.trim_start().len()];
        let after = format!("{indent}{ITEM_PREFIX}{}", body.trim());

        log::debug!("line {line_no}: inserting \\item");
        changes.push(Change {
            line: line_no,
            before: body.to_string(),
            after: after.clone(),
            snippet: snippet.to_string(),
        });
        lines.push(format!("{after}{terminator}"));
    }

    RepairOutcome {
        text: lines.join("\n"),
        changes,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inserts_item_keeping_indent() {
        let input = "\\begin{itemize}\n    \\textbf{Bold} note\n\\end{itemize}\n";
        let outcome = repair(input, &ListRules::default());
        assert_eq!(
            outcome.text,
            "\\begin{itemize}\n    \\item \\textbf{Bold} note\n\\end{itemize}\n"
        );
        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(outcome.changes[0].line, 2);
        assert_eq!(outcome.changes[0].before, "    \\textbf{Bold} note");
    }

    #[test]
    fn test_preserves_crlf() {
        let input = "\\begin{itemize}\r\n\t\\emph{x}\r\n\\end{itemize}\r\n";
        let outcome = repair(input, &ListRules::default());
        assert_eq!(
            outcome.text,
            "\\begin{itemize}\r\n\t\\item \\emph{x}\r\n\\end{itemize}\r\n"
        );
    }

    #[test]
    fn test_unrepairable_findings_leave_text_alone() {
        let input = "\\begin{enumerate}\n\\item ok\n\\end{itemize}";
        let outcome = repair(input, &ListRules::default());
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.text, input);
        assert_eq!(outcome.issues.len(), 2);
    }

    #[test]
    fn test_repair_is_stable() {
        let input = "\\begin{itemize}\n\\textbf{a}\nbullet b\n\\item c\n\\end{itemize}\n";
        let first = repair(input, &ListRules::default());
        assert_eq!(first.changes.len(), 2);
        let second = repair(&first.text, &ListRules::default());
        assert!(second.is_unchanged());
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn test_extended_rules_fix_dash_entries() {
        let input = "\\begin{itemize}\n- first\n- second\n\\end{itemize}";
        assert!(repair(input, &ListRules::default()).is_unchanged());

        let outcome = repair(input, &ListRules::extended());
        assert_eq!(
            outcome.text,
            "\\begin{itemize}\n\\item - first\n\\item - second\n\\end{itemize}"
        );
    }

    #[test]
    fn test_leading_content_repair() {
        let rules = ListRules {
            flag_leading_content: true,
            ..ListRules::default()
        };
        let input = "\\begin{enumerate}\nFirst step\n\\item Second step\n\\end{enumerate}\n";
        let outcome = repair(input, &rules);
        assert_eq!(
            outcome.text,
            "\\begin{enumerate}\n\\item First step\n\\item Second step\n\\end{enumerate}\n"
        );
    }

    #[test]
    fn test_change_display() {
        let input = "\\begin{itemize}\n\\textbf{Bold note}\n\\end{itemize}\n";
        let outcome = repair(input, &ListRules::default());
        assert_eq!(
            outcome.changes[0].to_string(),
            "Added \\item to line 2: \\textbf{Bold note}..."
        );
    }
}
