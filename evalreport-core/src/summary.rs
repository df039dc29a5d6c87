//! Per-feature and run-wide counts.

use crate::outcome::TestOutcome;
use crate::status::Status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `passed / total * 100`, rounded to 2 decimals; 0.0 for an empty total.
pub fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = passed as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Counts for a group of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Passed tests.
    pub passed: usize,
    /// Failed tests.
    pub failed: usize,
    /// Skipped tests.
    pub skipped: usize,
    /// Tests with an unrecognized status.
    #[serde(default)]
    pub other: usize,
    /// All tests.
    pub total: usize,
    /// Pass rate in percent, 2 decimals.
    pub pass_rate: f64,
}

impl StatusCounts {
    /// Count one status.
    pub fn add(&mut self, status: &Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Skipped => self.skipped += 1,
            Status::Other(_) => self.other += 1,
        }
        self.total += 1;
        self.pass_rate = pass_rate(self.passed, self.total);
    }

    /// Count a sequence of statuses.
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a Status>) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.add(status);
        }
        counts
    }

    /// Percentage of each bucket, unrounded, for proportion charts.
    pub fn proportions(&self) -> (f64, f64, f64) {
        if self.total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let total = self.total as f64;
        (
            self.passed as f64 / total * 100.0,
            self.failed as f64 / total * 100.0,
            self.skipped as f64 / total * 100.0,
        )
    }
}

/// Aggregated counts for one feature.
pub type FeatureSummary = StatusCounts;

/// Group outcomes by feature key.
pub fn aggregate_by_feature(outcomes: &[TestOutcome]) -> BTreeMap<String, FeatureSummary> {
    let mut features: BTreeMap<String, FeatureSummary> = BTreeMap::new();
    for outcome in outcomes {
        features
            .entry(outcome.feature.clone())
            .or_default()
            .add(&outcome.status);
    }
    features
}
