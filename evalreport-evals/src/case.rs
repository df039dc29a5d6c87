//! Evaluation case definitions.

use crate::metric::{MetricKind, Threshold};

/// One parameterized metric check against a single sample.
#[derive(Debug, Clone)]
pub struct Case<Inputs> {
    /// Test identifier, e.g. `tests/test_rag.py::TestRag::test_faithfulness[fixture0]`.
    pub identifier: String,
    /// Sample handed to the scorer.
    pub inputs: Inputs,
    /// Metric to compute.
    pub metric: MetricKind,
    /// Pass threshold.
    pub threshold: Threshold,
    /// Tags for filtering.
    pub tags: Vec<String>,
    /// Skip reason, if the case is marked skipped.
    pub skip: Option<String>,
}

impl<Inputs> Case<Inputs> {
    /// Create a case using the metric's default threshold.
    pub fn new(identifier: impl Into<String>, metric: MetricKind, inputs: Inputs) -> Self {
        Self {
            identifier: identifier.into(),
            inputs,
            metric,
            threshold: metric.default_threshold(),
            tags: Vec::new(),
            skip: None,
        }
    }

    /// Override the threshold.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add multiple tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Mark the case skipped.
    pub fn skipped(mut self, reason: impl Into<String>) -> Self {
        self.skip = Some(reason.into());
        self
    }

    /// Check if case has a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
