//! Error types for SymptomCheck
//!
//! Fatal startup failures (configuration, dataset) are kept apart from the
//! recoverable ones (empty selection) and from model failures, which never
//! reach the user and are folded into a fallback suggestion instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the symptom checker
#[derive(Error, Debug)]
pub enum CheckerError {
    /// Missing credential or unusable configuration file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset file missing, unreadable, or without the required columns
    #[error("Failed to load dataset {}: {reason}", path.display())]
    DatasetLoad { path: PathBuf, reason: String },

    /// Analysis requested with nothing selected
    #[error("Please select at least one symptom")]
    NoSelection,

    /// Language model call failed or returned an unusable answer
    #[error("Model response error: {0}")]
    ModelResponse(#[from] ModelResponseError),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why the language model could not produce a suggestion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelResponseError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model returned no text")]
    EmptyResponse,

    /// Candidate missing, usually because the prompt was blocked
    #[error("no candidate returned ({0})")]
    Blocked(String),

    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),
}

impl ModelResponseError {
    /// Map a reqwest failure onto the transport/timeout variants
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelResponseError::Timeout
        } else {
            ModelResponseError::Transport(err.to_string())
        }
    }
}

/// Result type alias for checker operations
pub type Result<T> = std::result::Result<T, CheckerError>;

impl CheckerError {
    /// Build a dataset load error for `path`
    pub fn dataset(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CheckerError::DatasetLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Fatal errors halt startup; everything else is handled in place
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CheckerError::Config(_) | CheckerError::DatasetLoad { .. }
        )
    }
}
