use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a lint or repair invocation.
///
/// Structural problems in the document are never reported through this type;
/// they become [`Issue`](crate::Issue)s.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding label `{0}`")]
    UnknownEncoding(String),

    #[error("{path} is not valid {encoding}")]
    Decode { path: PathBuf, encoding: String },

    #[error("document contains characters not representable in {encoding} ({path})")]
    Encode { path: PathBuf, encoding: String },

    #[error("refusing to overwrite the input document {0}")]
    WouldOverwrite(PathBuf),

    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LintError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = LintError> = std::result::Result<T, E>;
