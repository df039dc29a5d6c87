//! Evaluation runner.
//!
//! Runs the cases of a suite one at a time and reports each case to a
//! [`RunObserver`] the way a test runner would: a setup event, a call event
//! carrying the outcome, then a teardown event.

use crate::case::Case;
use crate::error::EvalError;
use crate::evaluator::{EvaluationResult, MetricScorer};
use crate::metric::MetricKind;
use crate::suite::EvalSuite;
use evalreport_core::{Phase, RunObserver, Status, TestEvent};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Options for running evaluations.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Timeout per case.
    pub timeout: Option<Duration>,
    /// Whether to stop on first failure.
    pub fail_fast: bool,
    /// Only run cases carrying this tag.
    pub tag: Option<String>,
}

impl RunOptions {
    /// Create new options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout per case.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable fail-fast mode.
    pub fn fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Only run cases with the given tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn selects<Inputs>(&self, case: &Case<Inputs>) -> bool {
        self.tag.as_deref().map_or(true, |tag| case.has_tag(tag))
    }
}

/// Result of one executed case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    /// Test identifier.
    pub identifier: String,
    /// Metric that was checked.
    pub metric: MetricKind,
    /// Evaluation outcome.
    pub result: EvaluationResult,
    /// Wall time spent scoring.
    pub duration: Duration,
}

impl CaseResult {
    /// Status reported for this case.
    pub fn status(&self) -> Status {
        self.result.status()
    }

    /// Check if the case failed or errored.
    pub fn failed(&self) -> bool {
        self.result.is_fail() || self.result.is_error()
    }
}

/// Sequential suite runner.
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    options: RunOptions,
}

impl SuiteRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set options.
    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Run every selected case of `suite`, reporting phases to `observer`.
    pub async fn run<Inputs, S>(
        &self,
        suite: &EvalSuite<Inputs>,
        scorer: &S,
        observer: &mut dyn RunObserver,
    ) -> Vec<CaseResult>
    where
        Inputs: Sync,
        S: MetricScorer<Inputs> + ?Sized,
    {
        let mut results = Vec::new();

        for case in suite.cases.iter().filter(|c| self.options.selects(c)) {
            let result = self.run_case(case, scorer, observer).await;
            let failed = result.failed();
            results.push(result);
            if failed && self.options.fail_fast {
                tracing::info!(identifier = %case.identifier, "Stopping after first failure");
                break;
            }
        }

        results
    }

    async fn run_case<Inputs, S>(
        &self,
        case: &Case<Inputs>,
        scorer: &S,
        observer: &mut dyn RunObserver,
    ) -> CaseResult
    where
        Inputs: Sync,
        S: MetricScorer<Inputs> + ?Sized,
    {
        let start = Instant::now();
        let id = case.identifier.as_str();

        if let Some(reason) = &case.skip {
            observer.observe(TestEvent::phase(id, Phase::Setup, Status::Skipped).with_detail(reason));
            observer.observe(TestEvent::call(id, Status::Skipped).with_detail(reason));
            observer.observe(TestEvent::phase(id, Phase::Teardown, Status::Passed));
            return CaseResult {
                identifier: case.identifier.clone(),
                metric: case.metric,
                result: EvaluationResult::skip(reason.clone()),
                duration: start.elapsed(),
            };
        }

        observer.observe(TestEvent::phase(id, Phase::Setup, Status::Passed));

        let result = self.evaluate(case, scorer).await;
        tracing::debug!(identifier = id, metric = %case.metric, %result, "Case finished");

        let mut event = TestEvent::call(id, result.status());
        if let Some(reason) = result.reason() {
            event = event.with_detail(reason);
        }
        observer.observe(event);
        observer.observe(TestEvent::phase(id, Phase::Teardown, Status::Passed));

        CaseResult {
            identifier: case.identifier.clone(),
            metric: case.metric,
            result,
            duration: start.elapsed(),
        }
    }

    async fn evaluate<Inputs, S>(&self, case: &Case<Inputs>, scorer: &S) -> EvaluationResult
    where
        Inputs: Sync,
        S: MetricScorer<Inputs> + ?Sized,
    {
        let scored = AssertUnwindSafe(scorer.score(case.metric, &case.inputs)).catch_unwind();

        let outcome = match self.options.timeout {
            Some(limit) => match timeout(limit, scored).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return EvaluationResult::fail(format!(
                        "Timeout: {} exceeded {:?}",
                        case.metric, limit
                    ))
                }
            },
            None => scored.await,
        };

        match outcome {
            Ok(Ok(score)) => case.threshold.check(case.metric, score),
            Ok(Err(EvalError::Skip(reason))) => EvaluationResult::skip(reason),
            Ok(Err(e)) => EvaluationResult::error(e.to_string()),
            Err(panic) => EvaluationResult::error(format!(
                "Scorer panicked: {}",
                panic_message(panic.as_ref())
            )),
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
