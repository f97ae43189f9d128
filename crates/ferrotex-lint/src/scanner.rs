//! Environment balance scanner.
//!
//! A single forward pass over the lines of a document. Open environments are
//! tracked on an explicit [`EnvironmentStack`]; every irregularity becomes an
//! [`Issue`] and the pass never fails.
//!
//! Only the first `\begin{..}` and the first `\end{..}` of a line are
//! considered. The begin is pushed before the end is checked, so a one-line
//! `\begin{x} .. \end{x}` pushes and immediately pops its own frame, while a
//! line with two begins only opens the first.

use crate::issue::{Issue, IssueKind};
use crate::rules::ListRules;
use once_cell::sync::Lazy;
use regex::Regex;

static BEGIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\begin\{([^}]+)\}").expect("begin pattern is valid"));
static END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\end\{([^}]+)\}").expect("end pattern is valid"));
/// A line holding nothing but a `\begin` and an optional `[..]` argument.
static BARE_BEGIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\begin\{[^}]+\}(?:\[[^\]]*\])?$").expect("bare begin pattern is valid")
});

/// An open environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    /// 1-based line of the `\begin`.
    pub opened_at: usize,
}

/// Currently open environments, innermost last.
#[derive(Debug, Default)]
pub struct EnvironmentStack {
    frames: Vec<Frame>,
}

impl EnvironmentStack {
    pub fn push(&mut self, name: &str, line: usize) {
        self.frames.push(Frame {
            name: name.to_string(),
            opened_at: line,
        });
    }

    /// Pops the innermost frame if it is named `name`. Leaves the stack
    /// untouched and returns `None` otherwise.
    pub fn pop_matching(&mut self, name: &str) -> Option<Frame> {
        match self.frames.last() {
            Some(top) if top.name == name => self.frames.pop(),
            _ => None,
        }
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Remaining frames, outermost first.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

fn first_capture<'t>(re: &Regex, line: &'t str) -> Option<&'t str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Scans documents for unbalanced environments and list lines missing `\item`.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentScanner {
    rules: ListRules,
}

impl EnvironmentScanner {
    pub fn new(rules: ListRules) -> Self {
        Self { rules }
    }

    /// Scans raw document text, splitting on `\n`.
    pub fn scan_text(&self, text: &str) -> Vec<Issue> {
        self.scan(text.split('\n'))
    }

    /// Scans an ordered sequence of lines. Line numbers in the returned
    /// issues are 1-based positions in `lines`; issues come in detection
    /// order with unclosed environments last.
    pub fn scan<'a, I>(&self, lines: I) -> Vec<Issue>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut stack = EnvironmentStack::default();
        let mut issues = Vec::new();
        let mut awaiting_first_entry = false;

        for (idx, raw) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('%') {
                continue;
            }

            let leading = std::mem::take(&mut awaiting_first_entry);

            let opened = first_capture(&BEGIN_RE, line);
            if let Some(name) = opened {
                stack.push(name, line_no);
            }

            if let Some(name) = first_capture(&END_RE, line) {
                if stack.pop_matching(name).is_none() {
                    log::debug!("line {line_no}: unmatched \\end{{{name}}}");
                    issues.push(Issue::new(
                        line_no,
                        IssueKind::UnmatchedEnd {
                            name: name.to_string(),
                        },
                    ));
                }
            }

            let Some(current) = stack.top() else {
                continue;
            };

            if opened.is_some() && current.opened_at == line_no && BARE_BEGIN_RE.is_match(line) {
                awaiting_first_entry = self.rules.is_list_environment(&current.name);
            }

            if !self.rules.is_list_environment(&current.name) || self.rules.is_exempt(line) {
                continue;
            }

            if let Some(trigger) = self.rules.triggers.matches(line) {
                log::debug!("line {line_no}: `{trigger}` inside {} without \\item", current.name);
                issues.push(Issue::new(
                    line_no,
                    IssueKind::MissingItem {
                        environment: current.name.clone(),
                        snippet: self.rules.snippet(line),
                    },
                ));
            } else if leading && self.rules.flag_leading_content && !line.starts_with('\\') {
                issues.push(Issue::new(
                    line_no,
                    IssueKind::ContentBeforeFirstItem {
                        environment: current.name.clone(),
                        snippet: self.rules.snippet(line),
                    },
                ));
            }
        }

        for frame in stack.into_frames() {
            issues.push(Issue::new(
                frame.opened_at,
                IssueKind::Unclosed { name: frame.name },
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<Issue> {
        EnvironmentScanner::default().scan_text(input)
    }

    #[test]
    fn test_stack_pop_matching() {
        let mut stack = EnvironmentStack::default();
        stack.push("document", 1);
        stack.push("itemize", 2);
        assert!(stack.pop_matching("enumerate").is_none());
        assert_eq!(stack.len(), 2);
        let popped = stack.pop_matching("itemize").unwrap();
        assert_eq!(popped.opened_at, 2);
        assert_eq!(stack.top().map(|f| f.name.as_str()), Some("document"));
    }

    #[test]
    fn test_balanced_nested_environments() {
        let input = "\\begin{document}\n\\begin{itemize}\n\\item a\n\\begin{enumerate}\n\\item b\n\\end{enumerate}\n\\end{itemize}\n\\end{document}\n";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let input = "\\begin{itemize}\n\n% \\textbf{commented}\n   % \\end{enumerate}\n\\item x\n\\end{itemize}";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn test_unmatched_end_leaves_stack_alone() {
        let input = "\\begin{figure}\n\\end{table}\n\\end{figure}\n";
        let issues = scan(input);
        assert_eq!(
            issues,
            vec![Issue::new(2, IssueKind::UnmatchedEnd { name: "table".to_string() })]
        );
    }

    #[test]
    fn test_unclosed_reported_outermost_first() {
        let input = "\\begin{document}\n\\begin{itemize}\n\\item a\n";
        let issues = scan(input);
        assert_eq!(
            issues,
            vec![
                Issue::new(1, IssueKind::Unclosed { name: "document".to_string() }),
                Issue::new(2, IssueKind::Unclosed { name: "itemize".to_string() }),
            ]
        );
    }

    #[test]
    fn test_trigger_outside_list_is_ignored() {
        let input = "\\begin{center}\n\\textbf{Title}\n\\end{center}\n";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn test_innermost_environment_decides() {
        // A tabular nested in a list is not itself a list.
        let input = "\\begin{itemize}\n\\item table:\n\\begin{tabular}{ll}\n\\textbf{a} & b\n\\end{tabular}\n\\end{itemize}\n";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn test_one_line_environment_pushes_then_pops() {
        let input = "\\begin{itemize}\\item a\\end{itemize}\n";
        assert!(scan(input).is_empty());
    }

    #[test]
    fn test_second_begin_on_line_is_not_seen() {
        let input = "\\begin{a}\\begin{b}\n\\end{b}\n\\end{a}\n";
        let issues = scan(input);
        assert_eq!(
            issues,
            vec![Issue::new(2, IssueKind::UnmatchedEnd { name: "b".to_string() })]
        );
    }

    #[test]
    fn test_optional_argument_after_begin() {
        let input = "\\begin{enumerate}[label=(\\alph*)]\n\\emph{first}\n\\end{enumerate}\n";
        let issues = scan(input);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert!(matches!(
            &issues[0].kind,
            IssueKind::MissingItem { environment, .. } if environment == "enumerate"
        ));
    }

    #[test]
    fn test_snippet_is_truncated() {
        let long = format!("\\textbf{{{}}}", "x".repeat(80));
        let input = format!("\\begin{{itemize}}\n{long}\n\\end{{itemize}}");
        let issues = scan(&input);
        match &issues[0].kind {
            IssueKind::MissingItem { snippet, .. } => assert_eq!(snippet.chars().count(), 50),
            other => panic!("unexpected issue {other:?}"),
        }
    }

    #[test]
    fn test_leading_content_is_opt_in() {
        let input = "\\begin{itemize}\n\nFirst entry\n\\item second\n\\end{itemize}\n";
        assert!(scan(input).is_empty());

        let rules = ListRules {
            flag_leading_content: true,
            ..ListRules::default()
        };
        let issues = EnvironmentScanner::new(rules).scan_text(input);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 3);
        assert!(matches!(issues[0].kind, IssueKind::ContentBeforeFirstItem { .. }));
    }

    #[test]
    fn test_leading_content_only_checks_first_line() {
        let rules = ListRules {
            flag_leading_content: true,
            ..ListRules::default()
        };
        let input = "\\begin{itemize}\n\\item a\ncontinued text\n\\end{itemize}\n";
        assert!(EnvironmentScanner::new(rules).scan_text(input).is_empty());
    }

    #[test]
    fn test_leading_content_needs_bare_begin_line() {
        let rules = ListRules {
            flag_leading_content: true,
            ..ListRules::default()
        };
        let scanner = EnvironmentScanner::new(rules);

        // The first entry starts on the begin line; the next line continues it.
        let input = "\\begin{itemize} \\item first entry\ncontinued sentence of first entry\n\\item second\n\\end{itemize}\n";
        assert!(scanner.scan_text(input).is_empty(), "continuation line flagged");

        // An optional argument still counts as a bare begin line.
        let input = "\\begin{enumerate}[label=(\\alph*)]\nFirst step\n\\end{enumerate}\n";
        let issues = scanner.scan_text(input);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert!(matches!(issues[0].kind, IssueKind::ContentBeforeFirstItem { .. }));
    }

    #[test]
    fn test_trigger_takes_precedence_over_leading_content() {
        let rules = ListRules {
            flag_leading_content: true,
            ..ListRules::default()
        };
        let input = "\\begin{itemize}\nbullet one\n\\end{itemize}\n";
        let issues = EnvironmentScanner::new(rules).scan_text(input);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0].kind, IssueKind::MissingItem { .. }));
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = "\\begin{itemize}\r\n\\textbf{x}\r\n\\end{itemize}\r\n";
        let issues = scan(input);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
    }
}
