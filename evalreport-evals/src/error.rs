//! Evaluation errors.

use thiserror::Error;

/// Errors that can occur while preparing or scoring a case.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Dataset loading error.
    #[error("Failed to load dataset: {0}")]
    DatasetLoad(String),

    /// Dataset serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The metric scorer failed.
    #[error("Scorer '{metric}' failed: {message}")]
    ScorerFailed {
        /// Metric name.
        metric: String,
        /// Error message.
        message: String,
    },

    /// The case should be skipped, e.g. the chat API reported an error.
    #[error("Skipped: {0}")]
    Skip(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Other error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl EvalError {
    /// Create a dataset load error.
    pub fn dataset_load(msg: impl Into<String>) -> Self {
        Self::DatasetLoad(msg.into())
    }

    /// Create a scorer failed error.
    pub fn scorer_failed(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScorerFailed {
            metric: metric.into(),
            message: message.into(),
        }
    }

    /// Create a skip signal.
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip(reason.into())
    }

    /// Check if this is a skip signal.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }
}

/// Result type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;
