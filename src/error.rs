//! Error types for search-arena.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur outside the evaluation pipeline itself.
///
/// Judge failures during an evaluation are never surfaced as `EvalError`;
/// they are folded into the dataset's error tally instead.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error during serialization/deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The case file does not exist.
    #[error("Comparison case not found at '{0}'")]
    CaseNotFound(PathBuf),

    /// The cases directory does not exist or is not a directory.
    #[error("Cases path '{0}' does not exist or is not a directory")]
    InvalidCasesPath(PathBuf),

    /// No case files found in the directory.
    #[error("No comparison cases found in '{0}'")]
    EmptyCases(PathBuf),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM response parsing error.
    #[error("Failed to parse LLM response: {0}")]
    LlmParse(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A relevance grade outside 0..=3.
    #[error("Invalid relevance grade {0}, expected 0-3")]
    InvalidGrade(u8),
}

impl EvalError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        EvalError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for EvalError {
    fn from(err: serde_json::Error) -> Self {
        EvalError::LlmParse(err.to_string())
    }
}
