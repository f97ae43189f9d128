//! Policy deciding which lines inside a list environment look like entries
//! that lost their `\item`.
//!
//! The policy is plain data so it can be loaded from configuration, printed,
//! and tested without running a scan.

use serde::{Deserialize, Serialize};

/// Substrings whose presence marks a line as a likely list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSet {
    pub markers: Vec<String>,
    /// Compare markers against the lowercased line.
    #[serde(default)]
    pub case_insensitive: bool,
}

impl Default for TriggerSet {
    fn default() -> Self {
        Self {
            markers: vec![
                "\\textbf{".to_string(),
                "\\emph{".to_string(),
                "bullet".to_string(),
                "•".to_string(),
            ],
            case_insensitive: false,
        }
    }
}

impl TriggerSet {
    /// The broader set used by the original list fixer: any bold or emphasis
    /// opener, bullets, and dash or asterisk prefixes, ignoring case.
    pub fn extended() -> Self {
        Self {
            markers: vec![
                "textbf{".to_string(),
                "emph{".to_string(),
                "bullet".to_string(),
                "•".to_string(),
                "-".to_string(),
                "*".to_string(),
            ],
            case_insensitive: true,
        }
    }

    /// Returns the first marker found in `line`, if any.
    pub fn matches(&self, line: &str) -> Option<&str> {
        if self.case_insensitive {
            let lowered = line.to_lowercase();
            self.markers
                .iter()
                .find(|m| lowered.contains(&m.to_lowercase()))
                .map(String::as_str)
        } else {
            self.markers
                .iter()
                .find(|m| line.contains(m.as_str()))
                .map(String::as_str)
        }
    }
}

/// Everything the scanner needs to know about list environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListRules {
    /// Environment names whose content lines are expected to be items.
    pub list_environments: Vec<String>,
    /// Trimmed lines starting with one of these are never flagged.
    pub exempt_prefixes: Vec<String>,
    pub triggers: TriggerSet,
    /// Number of characters of the offending line quoted in an issue.
    pub snippet_len: usize,
    /// Also flag plain text directly after a list `\begin`.
    pub flag_leading_content: bool,
}

impl Default for ListRules {
    fn default() -> Self {
        Self {
            list_environments: vec!["enumerate".to_string(), "itemize".to_string()],
            exempt_prefixes: vec![
                "\\item".to_string(),
                "\\end{".to_string(),
                "\\begin{".to_string(),
                "\\caption".to_string(),
                "\\label".to_string(),
            ],
            triggers: TriggerSet::default(),
            snippet_len: 50,
            flag_leading_content: false,
        }
    }
}

impl ListRules {
    /// Rules matching the original list fixer: sectioning commands are exempt
    /// and the extended trigger set applies.
    pub fn extended() -> Self {
        let mut rules = Self::default();
        rules.apply_extended();
        rules
    }

    /// Switches to the extended trigger set and exempts sectioning commands,
    /// keeping environments, snippet length and other exemptions as they are.
    pub fn apply_extended(&mut self) {
        for prefix in ["\\section", "\\chapter"] {
            if !self.exempt_prefixes.iter().any(|p| p == prefix) {
                self.exempt_prefixes.push(prefix.to_string());
            }
        }
        self.triggers = TriggerSet::extended();
    }

    pub fn is_list_environment(&self, name: &str) -> bool {
        self.list_environments.iter().any(|env| env == name)
    }

    pub fn is_exempt(&self, trimmed: &str) -> bool {
        self.exempt_prefixes
            .iter()
            .any(|prefix| trimmed.starts_with(prefix.as_str()))
    }

    /// First `snippet_len` characters of `trimmed`.
    pub fn snippet(&self, trimmed: &str) -> String {
        trimmed.chars().take(self.snippet_len).collect()
    }
}
