//! Error type shared by every stage of the analysis.
//!
//! Stages fail synchronously and the error is handed back unmodified; the
//! pipeline never retries and never returns partial results.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Empty or malformed input (empty text, empty token list, empty table, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A requested size (top-K, top-X) or option is outside its valid range.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        AnalysisError::InvalidInput(msg.into())
    }

    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        AnalysisError::Configuration(msg.into())
    }

    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalysisError::InvalidInput(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, AnalysisError::Configuration(_))
    }

    /// Prefix the message with the 1-based segment index, keeping the error kind.
    pub fn in_segment(self, index: usize) -> Self {
        match self {
            AnalysisError::InvalidInput(msg) => {
                AnalysisError::InvalidInput(format!("segment {index}: {msg}"))
            }
            AnalysisError::Configuration(msg) => {
                AnalysisError::Configuration(format!("segment {index}: {msg}"))
            }
            other => other,
        }
    }
}
