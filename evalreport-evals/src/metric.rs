//! Quality metrics and their pass thresholds.

use crate::evaluator::EvaluationResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A response-quality metric computed by the external evaluation library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Claims in the response are supported by the retrieved context.
    Faithfulness,
    /// Relevant context chunks are ranked first.
    ContextPrecision,
    /// The retrieved context covers the reference.
    ContextRecall,
    /// The response addresses the question.
    AnswerRelevancy,
    /// The response agrees with the reference facts.
    FactualCorrectness,
    /// Rubric grade, 1 to 5.
    Rubric,
    /// Binary verdict against a described aspect.
    AspectCritic,
    /// Multi-turn conversation stays on the allowed topics.
    TopicAdherence,
    /// Multi-turn conversation remembers earlier turns.
    ConversationalMemory,
}

impl MetricKind {
    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Faithfulness => "Faithfulness",
            Self::ContextPrecision => "Context Precision",
            Self::ContextRecall => "Context Recall",
            Self::AnswerRelevancy => "Answer Relevancy",
            Self::FactualCorrectness => "Factual Correctness",
            Self::Rubric => "Rubric",
            Self::AspectCritic => "Aspect Critic",
            Self::TopicAdherence => "Topic Adherence",
            Self::ConversationalMemory => "Conversational Memory",
        }
    }

    /// Default pass threshold.
    pub fn default_threshold(&self) -> Threshold {
        match self {
            Self::Rubric => Threshold::at_least(3.0),
            Self::TopicAdherence | Self::ConversationalMemory => Threshold::above(0.8),
            _ => Threshold::above(0.7),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a score is compared to the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `score > threshold`
    Above,
    /// `score >= threshold`
    AtLeast,
}

/// Minimum acceptable score for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Bound value.
    pub value: f64,
    /// Comparison operator.
    pub comparison: Comparison,
}

impl Threshold {
    /// Require `score > value`.
    pub fn above(value: f64) -> Self {
        Self {
            value,
            comparison: Comparison::Above,
        }
    }

    /// Require `score >= value`.
    pub fn at_least(value: f64) -> Self {
        Self {
            value,
            comparison: Comparison::AtLeast,
        }
    }

    /// Check a score. NaN never passes.
    pub fn accepts(&self, score: f64) -> bool {
        match self.comparison {
            Comparison::Above => score > self.value,
            Comparison::AtLeast => score >= self.value,
        }
    }

    fn operator(&self) -> &'static str {
        match self.comparison {
            Comparison::Above => ">",
            Comparison::AtLeast => ">=",
        }
    }

    /// Assert a metric score against this threshold.
    ///
    /// A failed check reads `AssertionError: <metric> too low: ...`, which the
    /// reporter files under `AssertionError`.
    pub fn check(&self, metric: MetricKind, score: f64) -> EvaluationResult {
        if self.accepts(score) {
            EvaluationResult::pass_full(
                score,
                format!("{} {} {} passed", metric, self.operator(), self.value),
            )
        } else {
            EvaluationResult::fail_with_score(
                format!(
                    "AssertionError: {} too low: {}. Expected {} {}",
                    metric,
                    score,
                    self.operator(),
                    self.value
                ),
                score,
            )
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MetricKind::Faithfulness, 0.71, true)]
    #[case(MetricKind::Faithfulness, 0.7, false)]
    #[case(MetricKind::ContextRecall, 0.2, false)]
    #[case(MetricKind::Rubric, 3.0, true)]
    #[case(MetricKind::Rubric, 2.0, false)]
    #[case(MetricKind::TopicAdherence, 0.8, false)]
    #[case(MetricKind::ConversationalMemory, 0.9, true)]
    fn test_default_thresholds(#[case] metric: MetricKind, #[case] score: f64, #[case] passes: bool) {
        assert_eq!(metric.default_threshold().accepts(score), passes);
    }

    #[test]
    fn test_nan_never_passes() {
        assert!(!Threshold::above(0.0).accepts(f64::NAN));
        assert!(!Threshold::at_least(0.0).accepts(f64::NAN));
    }

    #[test]
    fn test_failed_check_message() {
        let result = Threshold::above(0.7).check(MetricKind::ContextPrecision, 0.5);
        assert!(result.is_fail());
        assert_eq!(
            result.reason(),
            Some("AssertionError: Context Precision too low: 0.5. Expected > 0.7")
        );
    }

    #[test]
    fn test_passed_check_keeps_score() {
        let result = Threshold::at_least(3.0).check(MetricKind::Rubric, 4.0);
        assert!(result.is_pass());
        assert_eq!(result.score(), Some(4.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Threshold::at_least(3.0).to_string(), ">= 3");
        assert_eq!(MetricKind::AnswerRelevancy.to_string(), "Answer Relevancy");
    }
}
