use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal diagnostic finding, anchored at a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub line: usize,
    #[serde(flatten)]
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum IssueKind {
    /// An `\end{name}` that does not close the innermost open environment.
    UnmatchedEnd { name: String },
    /// A line inside a list environment that looks like an entry but has no `\item`.
    MissingItem { environment: String, snippet: String },
    /// Plain text directly after a list `\begin`, before any `\item`.
    ContentBeforeFirstItem { environment: String, snippet: String },
    /// A `\begin{name}` still open at end of input. The issue line is the opening line.
    Unclosed { name: String },
}

impl Issue {
    pub fn new(line: usize, kind: IssueKind) -> Self {
        Self { line, kind }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            IssueKind::UnmatchedEnd { name } => {
                format!("Unmatched \\end{{{name}}} - no corresponding \\begin")
            }
            IssueKind::MissingItem {
                environment,
                snippet,
            } => format!("Potential missing \\item in {environment}: {snippet}..."),
            IssueKind::ContentBeforeFirstItem {
                environment,
                snippet,
            } => format!("Text before the first \\item in {environment}: {snippet}..."),
            IssueKind::Unclosed { name } => format!("Unclosed \\begin{{{name}}}"),
        }
    }

    /// True for findings the repair pass can fix by inserting `\item`.
    pub fn is_repairable(&self) -> bool {
        matches!(
            self.kind,
            IssueKind::MissingItem { .. } | IssueKind::ContentBeforeFirstItem { .. }
        )
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message())
    }
}
