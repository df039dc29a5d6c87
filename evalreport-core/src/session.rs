//! Run session state and the reporter that owns it.

use crate::classify::{classify, FailureCategory};
use crate::error::{ReportError, ReportResult};
use crate::feature::feature_key;
use crate::log::RunLog;
use crate::outcome::{TestEvent, TestOutcome};
use crate::report::{FailureRow, FeatureRow, SummaryReport};
use crate::status::Status;
use crate::summary::{aggregate_by_feature, FeatureSummary, StatusCounts};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Default project display name.
pub const DEFAULT_PROJECT_NAME: &str = "Pytest-OpenAI-Ragas";

/// Reporter options.
#[derive(Debug, Clone)]
pub struct ReporterOptions {
    /// Project name shown in the summary.
    pub project_name: String,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

impl ReporterOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the project name.
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    /// Read `PROJECT_NAME` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve options through a key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup("PROJECT_NAME").filter(|v| !v.trim().is_empty()) {
            Some(name) => Self::new().project_name(name.trim()),
            None => Self::new(),
        }
    }
}

/// Lifecycle callbacks a test runner drives.
pub trait RunObserver {
    /// The run is starting.
    fn session_start(&mut self);

    /// A phase report arrived. Only call-phase events become outcomes.
    fn observe(&mut self, event: TestEvent);

    /// The run is over.
    fn session_end(&mut self);
}

/// State accumulated over one run.
#[derive(Debug, Clone)]
pub struct RunSession {
    /// Run id.
    pub run_id: Uuid,
    /// When the run started.
    pub start_time: Option<DateTime<Local>>,
    /// When the run ended.
    pub end_time: Option<DateTime<Local>>,
    outcomes: Vec<TestOutcome>,
    status_counts: BTreeMap<Status, usize>,
    failure_counts: BTreeMap<FailureCategory, usize>,
}

impl RunSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            start_time: None,
            end_time: None,
            outcomes: Vec::new(),
            status_counts: BTreeMap::new(),
            failure_counts: BTreeMap::new(),
        }
    }

    /// Recorded outcomes in arrival order.
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Run-wide count per status.
    pub fn status_counts(&self) -> &BTreeMap<Status, usize> {
        &self.status_counts
    }

    /// Run-wide count per failure category.
    pub fn failure_counts(&self) -> &BTreeMap<FailureCategory, usize> {
        &self.failure_counts
    }

    fn count(&self, status: &Status) -> usize {
        self.status_counts.get(status).copied().unwrap_or(0)
    }

    /// Check that counters agree with the outcome sequence.
    pub fn validate(&self) -> ReportResult<()> {
        let counted: usize = self.status_counts.values().sum();
        if counted != self.outcomes.len() {
            return Err(ReportError::invariant(format!(
                "{} statuses counted for {} outcomes",
                counted,
                self.outcomes.len()
            )));
        }

        let failed_outcomes = self
            .outcomes
            .iter()
            .filter(|o| o.status.is_failed())
            .count();
        let failures: usize = self.failure_counts.values().sum();
        if failures != failed_outcomes || self.count(&Status::Failed) != failed_outcomes {
            return Err(ReportError::invariant(format!(
                "{} failures classified for {} failed outcomes",
                failures, failed_outcomes
            )));
        }

        Ok(())
    }
}

impl Default for RunSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregates outcomes of one run and renders the summary.
pub struct Reporter<L> {
    options: ReporterOptions,
    log: L,
    session: RunSession,
}

impl<L: RunLog> Reporter<L> {
    /// Create a reporter with a fresh session.
    pub fn new(options: ReporterOptions, log: L) -> Self {
        Self {
            options,
            log,
            session: RunSession::new(),
        }
    }

    /// Reporter options.
    pub fn options(&self) -> &ReporterOptions {
        &self.options
    }

    /// The session state.
    pub fn session(&self) -> &RunSession {
        &self.session
    }

    /// The logging collaborator.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Record the start time.
    pub fn session_start(&mut self) {
        let now = Local::now();
        self.session.start_time = Some(now);
        self.log.info(&format!(
            "Session {} started at {}",
            self.session.run_id, now
        ));
    }

    /// Record the end time.
    pub fn session_end(&mut self) {
        let now = Local::now();
        self.session.end_time = Some(now);
        self.log.info(&format!(
            "Session {} finished at {}",
            self.session.run_id, now
        ));
    }

    /// Record the main-phase result of one test.
    pub fn record_outcome(
        &mut self,
        identifier: &str,
        status: impl Into<Status>,
        failure_detail: Option<&str>,
    ) {
        let status = status.into();
        *self.session.status_counts.entry(status.clone()).or_insert(0) += 1;

        let failure_reason = if status.is_failed() {
            let category = classify(failure_detail);
            *self.session.failure_counts.entry(category).or_insert(0) += 1;
            self.log
                .error(&format!("Test failed: {} -> {}", identifier, category));
            Some(category)
        } else {
            None
        };

        if let Status::Other(label) = &status {
            self.log.warn(&format!(
                "Unrecognized status '{}' for {}, counted under its own label",
                label, identifier
            ));
        }

        self.session.outcomes.push(TestOutcome {
            identifier: identifier.to_string(),
            feature: feature_key(identifier),
            status,
            failure_reason,
        });
    }

    /// Counts per feature.
    pub fn aggregate_by_feature(&self) -> BTreeMap<String, FeatureSummary> {
        aggregate_by_feature(&self.session.outcomes)
    }

    /// Build the summary. Fails only if the session state is inconsistent.
    pub fn render_summary(&self) -> ReportResult<SummaryReport> {
        self.session.validate()?;

        let totals = StatusCounts::from_statuses(self.session.outcomes.iter().map(|o| &o.status));

        let other_statuses = self
            .session
            .status_counts
            .iter()
            .filter_map(|(status, count)| match status {
                Status::Other(label) => Some((label.clone(), *count)),
                _ => None,
            })
            .collect();

        let features = self
            .aggregate_by_feature()
            .into_iter()
            .map(|(feature, counts)| FeatureRow { feature, counts })
            .collect();

        let mut failures: Vec<FailureRow> = self
            .session
            .failure_counts
            .iter()
            .map(|(category, count)| FailureRow {
                category: *category,
                count: *count,
            })
            .collect();
        failures.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.category.label().cmp(b.category.label()))
        });

        Ok(SummaryReport {
            run_id: self.session.run_id,
            project_name: self.options.project_name.clone(),
            totals,
            other_statuses,
            features,
            failures,
            start_time: self.session.start_time,
            end_time: self.session.end_time,
        })
    }
}

impl<L: RunLog> RunObserver for Reporter<L> {
    fn session_start(&mut self) {
        Reporter::session_start(self);
    }

    fn observe(&mut self, event: TestEvent) {
        if !event.is_call() {
            return;
        }
        self.record_outcome(&event.identifier, event.status, event.detail.as_deref());
    }

    fn session_end(&mut self) {
        Reporter::session_end(self);
    }
}
