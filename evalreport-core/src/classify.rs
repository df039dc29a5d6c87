//! Failure classification by diagnostic keywords.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category assigned to a failed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureCategory {
    /// A test assertion did not hold.
    AssertionError,
    /// Something timed out.
    TimeoutError,
    /// An element or resource could not be located.
    LocatorError,
    /// Bad or missing test data.
    TestDataError,
    /// Network connection problem.
    ConnectionError,
    /// Access was denied.
    PermissionError,
    /// Nothing matched.
    UnknownError,
}

impl FailureCategory {
    /// All categories in match priority order.
    pub const ALL: [FailureCategory; 7] = [
        Self::AssertionError,
        Self::TimeoutError,
        Self::LocatorError,
        Self::TestDataError,
        Self::ConnectionError,
        Self::PermissionError,
        Self::UnknownError,
    ];

    /// Label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AssertionError => "AssertionError",
            Self::TimeoutError => "TimeoutError",
            Self::LocatorError => "LocatorError",
            Self::TestDataError => "TestDataError",
            Self::ConnectionError => "ConnectionError",
            Self::PermissionError => "PermissionError",
            Self::UnknownError => "UnknownError",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::AssertionError => &["assert"],
            Self::TimeoutError => &["timeout"],
            Self::LocatorError => &["not found", "locator"],
            Self::TestDataError => &["invalid", "data"],
            Self::ConnectionError => &["connection"],
            Self::PermissionError => &["permission"],
            Self::UnknownError => &[],
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a failure diagnostic.
///
/// Case-insensitive substring matching, first match wins, in the order of
/// [`FailureCategory::ALL`]. The order matters: generic keywords such as
/// `"data"` shadow later categories.
pub fn classify(detail: Option<&str>) -> FailureCategory {
    let Some(detail) = detail.filter(|d| !d.is_empty()) else {
        return FailureCategory::UnknownError;
    };

    let text = detail.to_lowercase();
    FailureCategory::ALL
        .iter()
        .copied()
        .find(|category| category.keywords().iter().any(|k| text.contains(k)))
        .unwrap_or(FailureCategory::UnknownError)
}
