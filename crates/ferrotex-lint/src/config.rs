use crate::error::{LintError, Result};
use crate::rules::ListRules;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENCODING: &str = "utf-8";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "-fixed";
pub const DEFAULT_CONTEXT_RADIUS: usize = 5;

/// Settings for a lint or repair run. Missing keys in a config file fall
/// back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// WHATWG label of the document encoding.
    pub encoding: String,
    /// Inserted before the extension of the repaired copy.
    pub output_suffix: String,
    /// Lines shown on each side of the target in context dumps.
    pub context_radius: usize,
    pub rules: ListRules,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            encoding: DEFAULT_ENCODING.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            context_radius: DEFAULT_CONTEXT_RADIUS,
            rules: ListRules::default(),
        }
    }
}

impl LintConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LintError::io(path, e))?;
        let config = serde_json::from_str(&content).map_err(|source| LintError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LintError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| LintError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|e| LintError::io(path, e))
    }
}
