//! Test statuses and execution phases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome status of a test's main phase.
///
/// Runners occasionally report statuses outside the usual three (`xfailed`,
/// `error`, ...). Those are kept verbatim in [`Status::Other`] so they are
/// still counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Test passed.
    Passed,
    /// Test failed.
    Failed,
    /// Test was skipped.
    Skipped,
    /// Unrecognized status label.
    Other(String),
}

impl Status {
    /// Parse a status label. Never fails; unknown labels become [`Status::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "skipped" => Self::Skipped,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// The label this status is counted under.
    pub fn label(&self) -> &str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Other(label) => label,
        }
    }

    /// Check if passed.
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Check if skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl From<String> for Status {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<&str> for Status {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.label().to_string()
    }
}

/// Phase of a single test execution.
///
/// Only [`Phase::Call`] produces an outcome; setup and teardown reports are
/// dropped by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fixture preparation.
    Setup,
    /// The test body.
    Call,
    /// Fixture cleanup.
    Teardown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Setup => "setup",
            Self::Call => "call",
            Self::Teardown => "teardown",
        };
        f.write_str(s)
    }
}
