//! Reporter errors.

use thiserror::Error;

/// Errors raised when a report is requested.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Accumulated run state contradicts itself.
    #[error("Report state invariant violated: {0}")]
    InvariantViolation(String),

    /// JSON rendering failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Create an invariant violation error.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
