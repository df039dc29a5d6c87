//! Evaluation results and the metric scorer seam.

use crate::error::EvalResult;
use crate::metric::MetricKind;
use async_trait::async_trait;
use evalreport_core::Status;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of evaluating one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvaluationResult {
    /// Passed with optional score and message.
    Pass {
        /// Metric score.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
        /// Optional message.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Failed with reason.
    Fail {
        /// Failure reason.
        reason: String,
        /// Score that failed the threshold, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
    /// Skipped.
    Skip {
        /// Skip reason.
        reason: String,
    },
    /// Error while scoring.
    Error {
        /// Error message.
        error: String,
    },
}

impl EvaluationResult {
    /// Create a pass result.
    pub fn pass() -> Self {
        Self::Pass {
            score: None,
            message: None,
        }
    }

    /// Create a pass with score and message.
    pub fn pass_full(score: f64, message: impl Into<String>) -> Self {
        Self::Pass {
            score: Some(score),
            message: Some(message.into()),
        }
    }

    /// Create a fail result.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            reason: reason.into(),
            score: None,
        }
    }

    /// Create a fail result carrying the score.
    pub fn fail_with_score(reason: impl Into<String>, score: f64) -> Self {
        Self::Fail {
            reason: reason.into(),
            score: Some(score),
        }
    }

    /// Create a skip result.
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip {
            reason: reason.into(),
        }
    }

    /// Create an error result.
    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    /// Check if passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }

    /// Check if failed.
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// Check if skipped.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    /// Check if error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Get the score if present.
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Pass { score, .. } | Self::Fail { score, .. } => *score,
            _ => None,
        }
    }

    /// Failure, skip, or error text.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Pass { .. } => None,
            Self::Fail { reason, .. } | Self::Skip { reason } => Some(reason),
            Self::Error { error } => Some(error),
        }
    }

    /// Status reported for the case. Errors count as failures.
    pub fn status(&self) -> Status {
        match self {
            Self::Pass { .. } => Status::Passed,
            Self::Fail { .. } | Self::Error { .. } => Status::Failed,
            Self::Skip { .. } => Status::Skipped,
        }
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass { score, message } => {
                write!(f, "✅ PASS")?;
                if let Some(s) = score {
                    write!(f, " (score: {:.2})", s)?;
                }
                if let Some(m) = message {
                    write!(f, " - {}", m)?;
                }
                Ok(())
            }
            Self::Fail { reason, .. } => write!(f, "❌ FAIL: {}", reason),
            Self::Skip { reason } => write!(f, "⏭️ SKIP: {}", reason),
            Self::Error { error } => write!(f, "⚠️ ERROR: {}", error),
        }
    }
}

/// Computes metric scores.
///
/// This is the seam to the external evaluation library and chat API: the
/// implementation fetches the chatbot response for `sample`, runs the metric,
/// and returns its score. Returning [`EvalError::Skip`](crate::EvalError::Skip)
/// marks the case skipped.
#[async_trait]
pub trait MetricScorer<Sample>: Send + Sync {
    /// Score one sample.
    async fn score(&self, metric: MetricKind, sample: &Sample) -> EvalResult<f64>;
}

/// Scorer backed by a plain function.
pub struct FunctionScorer<F> {
    func: F,
}

impl<F> FunctionScorer<F> {
    /// Create a new function-based scorer.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<Sample, F> MetricScorer<Sample> for FunctionScorer<F>
where
    Sample: Sync,
    F: Fn(MetricKind, &Sample) -> EvalResult<f64> + Send + Sync,
{
    async fn score(&self, metric: MetricKind, sample: &Sample) -> EvalResult<f64> {
        (self.func)(metric, sample)
    }
}
