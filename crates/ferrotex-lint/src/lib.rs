//! # FerroTeX List Lint
//!
//! Heuristic checks and repairs for LaTeX list environments.
//!
//! ## Overview
//!
//! Documents that fail with `Something's wrong--perhaps a missing \item` are
//! usually one of three things: an `\end` that closes the wrong environment,
//! a `\begin` that is never closed, or an entry inside `itemize`/`enumerate`
//! that lost its `\item`. This crate finds all three in a single forward pass
//! over the lines of a document and can insert the missing markers.
//!
//! It is not a LaTeX parser. Nested braces, verbatim content and `\input`
//! are not understood, and only the first `\begin` and `\end` of each line
//! are considered.
//!
//! ## Modules
//!
//! - [`scanner`] - the environment balance scanner
//! - [`rules`] - which lines count as suspicious entries
//! - [`repair`] - `\item` insertion driven by scan results
//! - [`report`] - text rendering of issues, changes and context windows
//! - [`source`] - encoding-aware document I/O
//! - [`config`] - run settings, loadable from JSON
//!
//! ## Examples
//!
//! ```
//! use ferrotex_lint::{EnvironmentScanner, IssueKind};
//!
//! let doc = "\\begin{itemize}\n\\textbf{Bold note}\n\\end{itemize}\n";
//! let issues = EnvironmentScanner::default().scan_text(doc);
//!
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].line, 2);
//! assert!(matches!(issues[0].kind, IssueKind::MissingItem { .. }));
//! ```
//!
//! ```
//! use ferrotex_lint::{repair, ListRules};
//!
//! let doc = "\\begin{itemize}\n\\textbf{Bold note}\n\\end{itemize}\n";
//! let outcome = repair(doc, &ListRules::default());
//! assert_eq!(outcome.text, "\\begin{itemize}\n\\item \\textbf{Bold note}\n\\end{itemize}\n");
//! ```

pub mod config;
pub mod error;
pub mod issue;
pub mod repair;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod source;

pub use config::LintConfig;
pub use error::{LintError, Result};
pub use issue::{Issue, IssueKind};
pub use repair::{Change, RepairOutcome, repair};
pub use rules::{ListRules, TriggerSet};
pub use scanner::{EnvironmentScanner, EnvironmentStack, Frame};

use std::path::{Path, PathBuf};

/// Reads `path` with the configured encoding and scans it.
pub fn diagnose_file(path: &Path, config: &LintConfig) -> Result<Vec<Issue>> {
    let text = source::read_document(path, &config.encoding)?;
    let issues = EnvironmentScanner::new(config.rules.clone()).scan_text(&text);
    log::info!("{}: {} issue(s)", path.display(), issues.len());
    Ok(issues)
}

/// Result of [`repair_file`].
#[derive(Debug)]
pub struct FileRepair {
    /// Where the repaired copy was written.
    pub output: PathBuf,
    pub outcome: RepairOutcome,
}

/// Repairs `path` and writes the result next to it, named with the
/// configured suffix. The input file is never modified.
pub fn repair_file(path: &Path, config: &LintConfig) -> Result<FileRepair> {
    let text = source::read_document(path, &config.encoding)?;
    let outcome = repair(&text, &config.rules);
    let output = source::fixed_output_path(path, &config.output_suffix);
    source::write_document(path, &output, &outcome.text, &config.encoding)?;
    Ok(FileRepair { output, outcome })
}
