//! Evaluation suite definitions.

use crate::case::Case;
use crate::dataset::Dataset;
use crate::metric::MetricKind;
use evalreport_core::feature::SEPARATOR;

/// The cases of one test file, optionally grouped under a class.
#[derive(Debug, Clone)]
pub struct EvalSuite<Inputs> {
    /// Test file path, e.g. `tests/test_rag.py`.
    pub file: String,
    /// Test class name.
    pub class: Option<String>,
    /// Cases in execution order.
    pub cases: Vec<Case<Inputs>>,
}

impl<Inputs> EvalSuite<Inputs> {
    /// Create a new suite for a test file.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            class: None,
            cases: Vec::new(),
        }
    }

    /// Group subsequent tests under a class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Identifier of a test method, without parameters.
    pub fn identifier(&self, method: &str) -> String {
        match &self.class {
            Some(class) => [self.file.as_str(), class, method].join(SEPARATOR),
            None => [self.file.as_str(), method].join(SEPARATOR),
        }
    }

    /// Add a case.
    pub fn add_case(mut self, case: Case<Inputs>) -> Self {
        self.cases.push(case);
        self
    }

    /// Add one case per dataset sample, identified `method[fixture<i>]`.
    pub fn parametrize(mut self, method: &str, metric: MetricKind, dataset: &Dataset<Inputs>) -> Self
    where
        Inputs: Clone,
    {
        let base = self.identifier(method);
        self.cases.extend(
            dataset
                .samples
                .iter()
                .enumerate()
                .map(|(i, sample)| {
                    Case::new(format!("{}[fixture{}]", base, i), metric, sample.clone())
                }),
        );
        self
    }

    /// Get number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Filter cases by tag.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Case<Inputs>> {
        self.cases.iter().filter(|c| c.has_tag(tag)).collect()
    }
}
