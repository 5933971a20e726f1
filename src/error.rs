use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, generating or presenting characters
#[derive(Debug, Error)]
pub enum UnicharError {
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: expected 4 tab-separated fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("Line {line}: invalid hexadecimal code {code:?}")]
    InvalidCode { line: usize, code: String },

    #[error("Line {line}: code {code:?} is not a Unicode scalar value")]
    NotScalar { line: usize, code: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("UCD error: {0}")]
    Ucd(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Result type alias for unichar operations
pub type UnicharResult<T> = Result<T, UnicharError>;

impl UnicharError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UnicharError::Io {
            path: path.into(),
            source,
        }
    }

    /// Load errors make the backing table unusable for the session.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            UnicharError::Io { .. }
                | UnicharError::FieldCount { .. }
                | UnicharError::InvalidCode { .. }
                | UnicharError::NotScalar { .. }
        )
    }
}

impl From<toml::de::Error> for UnicharError {
    fn from(err: toml::de::Error) -> Self {
        UnicharError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for UnicharError {
    fn from(err: reqwest::Error) -> Self {
        UnicharError::Http(err.to_string())
    }
}
