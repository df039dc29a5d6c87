//! Recorded test outcomes and the runner events they come from.

use crate::classify::FailureCategory;
use crate::status::{Phase, Status};
use serde::{Deserialize, Serialize};

/// One executed test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Full hierarchical identifier.
    pub identifier: String,
    /// Derived grouping key.
    pub feature: String,
    /// Result of the main phase.
    pub status: Status,
    /// Failure category, only for failed tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureCategory>,
}

/// A phase report as delivered by a test runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    /// Full hierarchical identifier.
    pub identifier: String,
    /// Which phase finished.
    pub phase: Phase,
    /// Phase status.
    pub status: Status,
    /// Diagnostic text for failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TestEvent {
    /// Create a call-phase event.
    pub fn call(identifier: impl Into<String>, status: impl Into<Status>) -> Self {
        Self {
            identifier: identifier.into(),
            phase: Phase::Call,
            status: status.into(),
            detail: None,
        }
    }

    /// Create an event for any phase.
    pub fn phase(identifier: impl Into<String>, phase: Phase, status: impl Into<Status>) -> Self {
        Self {
            identifier: identifier.into(),
            phase,
            status: status.into(),
            detail: None,
        }
    }

    /// Attach diagnostic text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Check if this event carries an outcome.
    pub fn is_call(&self) -> bool {
        self.phase == Phase::Call
    }
}
