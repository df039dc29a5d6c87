//! One run, wired end to end.
//!
//! A [`Harness`] owns the reporter and the dispatcher of a run. The host test
//! runner feeds it phase events through [`RunObserver`] and calls
//! [`Harness::finish`] once, which stamps the end time, renders the summary and
//! hands it to the dispatcher.

use evalreport_core::{
    Dispatcher, ReportError, Reporter, ReporterOptions, RunLog, RunObserver, RunSession,
    SummaryReport, TestEvent, TracingLog,
};
use thiserror::Error;

/// Errors surfaced to the host when a run is finished.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The summary could not be rendered.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// An environment file could not be loaded.
    #[cfg(feature = "mail")]
    #[error("Environment file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// An evaluation could not be prepared.
    #[cfg(feature = "evals")]
    #[error("Evaluation error: {0}")]
    Eval(#[from] evalreport_evals::EvalError),
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// A running report session.
pub struct Harness<L = TracingLog, D = Box<dyn Dispatcher>> {
    reporter: Reporter<L>,
    dispatcher: D,
}

impl<L: RunLog, D: Dispatcher> Harness<L, D> {
    /// Create the reporter and start the session.
    pub fn start(options: ReporterOptions, log: L, dispatcher: D) -> Self {
        let mut reporter = Reporter::new(options, log);
        reporter.session_start();
        Self {
            reporter,
            dispatcher,
        }
    }

    /// The reporter collecting outcomes.
    pub fn reporter(&self) -> &Reporter<L> {
        &self.reporter
    }

    /// The session state so far.
    pub fn session(&self) -> &RunSession {
        self.reporter.session()
    }

    /// End the session, render the summary and dispatch it.
    ///
    /// Dispatch problems are logged by the dispatcher and never returned. A
    /// render failure skips dispatch and is returned.
    pub fn finish(mut self) -> HarnessResult<SummaryReport> {
        self.reporter.session_end();

        let report = match self.reporter.render_summary() {
            Ok(report) => report,
            Err(e) => {
                self.reporter
                    .log()
                    .error(&format!("Summary not rendered: {}", e));
                return Err(e.into());
            }
        };

        self.reporter.log().info(&format!(
            "Run summary: {} passed, {} failed, {} skipped, {} total ({:.2}%)",
            report.totals.passed,
            report.totals.failed,
            report.totals.skipped,
            report.totals.total,
            report.totals.pass_rate
        ));
        self.dispatcher.dispatch(&report);
        Ok(report)
    }
}

#[cfg(feature = "mail")]
impl Harness<TracingLog, evalreport_mail::EmailDispatcher> {
    /// Harness configured from the environment, emailing the summary.
    ///
    /// A `.env` file in the working directory or its parents is loaded first;
    /// variables already set in the process win. Reads `PROJECT_NAME` now;
    /// SMTP settings are read when the run finishes.
    pub fn from_env() -> Self {
        let loaded = dotenvy::dotenv().ok();
        let harness = Self::from_process_env();
        if let Some(path) = loaded {
            harness
                .reporter
                .log()
                .info(&format!("Loaded environment from {}", path.display()));
        }
        harness
    }

    /// Like [`Harness::from_env`], loading a specific environment file.
    pub fn from_env_file(path: impl AsRef<std::path::Path>) -> HarnessResult<Self> {
        dotenvy::from_path(path.as_ref())?;
        Ok(Self::from_process_env())
    }

    fn from_process_env() -> Self {
        Self::start(
            ReporterOptions::from_env(),
            TracingLog::new("evalreport"),
            evalreport_mail::EmailDispatcher::from_env(TracingLog::new("email-reporter")),
        )
    }
}

/// The session is stamped by [`Harness::start`] and [`Harness::finish`]; host
/// lifecycle calls only forward phase events.
impl<L: RunLog, D: Dispatcher> RunObserver for Harness<L, D> {
    fn session_start(&mut self) {
        self.reporter
            .log()
            .warn("Session already started by the harness, ignoring session_start");
    }

    fn observe(&mut self, event: TestEvent) {
        RunObserver::observe(&mut self.reporter, event);
    }

    fn session_end(&mut self) {
        self.reporter
            .log()
            .warn("Session is ended by Harness::finish, ignoring session_end");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evalreport_core::{CapturedLog, LogLevel, NoopDispatcher, Phase, Status};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    /// Keeps every dispatched report.
    #[derive(Clone, Default)]
    struct Collecting {
        reports: Arc<Mutex<Vec<SummaryReport>>>,
    }

    impl Dispatcher for Collecting {
        fn dispatch(&self, report: &SummaryReport) {
            self.reports.lock().push(report.clone());
        }
    }

    #[test]
    fn test_start_stamps_session() {
        let harness = Harness::start(ReporterOptions::new(), CapturedLog::new(), NoopDispatcher);
        assert!(harness.session().start_time.is_some());
        assert!(harness.session().end_time.is_none());
    }

    #[test]
    fn test_finish_renders_and_dispatches_once() {
        let sink = Collecting::default();
        let log = CapturedLog::new();
        let mut harness = Harness::start(
            ReporterOptions::new().project_name("Chatbot-Evals"),
            log.clone(),
            sink.clone(),
        );

        let id = "tests/test_chat.py::TestChat::test_faithfulness[fixture0]";
        harness.observe(TestEvent::phase(id, Phase::Setup, Status::Passed));
        harness.observe(TestEvent::call(id, Status::Failed).with_detail("assert 0.4 > 0.7"));
        harness.observe(TestEvent::phase(id, Phase::Teardown, Status::Passed));
        harness.observe(TestEvent::call(
            "tests/test_chat.py::TestChat::test_faithfulness[fixture1]",
            Status::Passed,
        ));

        let report = harness.finish().unwrap();
        assert_eq!(report.project_name, "Chatbot-Evals");
        assert_eq!(report.totals.total, 2);
        assert!(report.end_time.is_some());

        let reports = sink.reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].totals, report.totals);
        assert!(log.contains(LogLevel::Info, "1 passed, 1 failed"));
    }

    #[test]
    fn test_empty_run_still_dispatches() {
        let sink = Collecting::default();
        let report = Harness::start(ReporterOptions::new(), CapturedLog::new(), sink.clone())
            .finish()
            .unwrap();

        assert_eq!(report.totals.total, 0);
        assert_eq!(report.totals.pass_rate, 0.0);
        assert_eq!(sink.reports.lock().len(), 1);
    }

    #[test]
    fn test_boxed_dispatcher() {
        let sink = Collecting::default();
        let dispatcher: Box<dyn Dispatcher> = Box::new(sink.clone());
        let harness: Harness<CapturedLog> =
            Harness::start(ReporterOptions::new(), CapturedLog::new(), dispatcher);
        harness.finish().unwrap();
        assert_eq!(sink.reports.lock().len(), 1);
    }

    #[cfg(feature = "evals")]
    #[tokio::test]
    async fn test_suite_runner_drives_harness() {
        use evalreport_evals::prelude::*;

        let dataset = Dataset::new().samples([0.95, 0.4]);
        let suite = EvalSuite::new("tests/test_rag.py")
            .class("TestRag")
            .parametrize("test_context_recall", MetricKind::ContextRecall, &dataset);
        let scorer =
            FunctionScorer::new(|_: MetricKind, score: &f64| -> EvalResult<f64> { Ok(*score) });

        let sink = Collecting::default();
        let mut harness = Harness::start(ReporterOptions::new(), CapturedLog::new(), sink.clone());
        SuiteRunner::new().run(&suite, &scorer, &mut harness).await;
        let report = harness.finish().unwrap();

        let feature = report.feature("TestRag::test_context_recall").unwrap();
        assert_eq!((feature.passed, feature.failed), (1, 1));
        assert_eq!(report.failures[0].category.label(), "AssertionError");
    }

    #[test]
    fn test_host_lifecycle_calls_keep_timestamps() {
        let log = CapturedLog::new();
        let mut harness = Harness::start(ReporterOptions::new(), log.clone(), NoopDispatcher);
        let started = harness.session().start_time;

        RunObserver::session_start(&mut harness);
        RunObserver::session_end(&mut harness);

        assert_eq!(harness.session().start_time, started);
        assert!(harness.session().end_time.is_none());
        assert_eq!(log.at(LogLevel::Warn).len(), 2);

        let report = harness.finish().unwrap();
        assert_eq!(report.start_time, started);
        assert!(report.end_time.is_some());
    }

    #[cfg(feature = "mail")]
    #[test]
    fn test_from_env_file_loads_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PROJECT_NAME=Loyalty-Bot-Evals\n").unwrap();

        let harness = Harness::from_env_file(&path).unwrap();
        assert_eq!(harness.reporter().options().project_name, "Loyalty-Bot-Evals");
    }

    #[cfg(feature = "mail")]
    #[test]
    fn test_from_env_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Harness::from_env_file(dir.path().join("absent.env")).err().unwrap();
        assert!(matches!(err, HarnessError::EnvFile(_)));
    }
}
