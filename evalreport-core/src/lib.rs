//! # evalreport-core
//!
//! Result aggregation for evaluation runs.
//!
//! A [`Reporter`] receives one outcome per executed test, groups the outcomes
//! by feature (`Class::method`, with parameterization stripped), classifies
//! failures by keyword, and renders a [`SummaryReport`] as HTML, text, or JSON.
//!
//! ## Example
//!
//! ```
//! use evalreport_core::{CapturedLog, Reporter, ReporterOptions};
//!
//! let mut reporter = Reporter::new(ReporterOptions::new(), CapturedLog::new());
//! reporter.session_start();
//! reporter.record_outcome("tests/test_x.py::TestA::test_b[0]", "passed", None);
//! reporter.record_outcome("tests/test_x.py::TestA::test_b[1]", "failed", Some("timeout waiting"));
//! reporter.session_end();
//!
//! let report = reporter.render_summary().unwrap();
//! assert_eq!(report.totals.pass_rate, 50.0);
//! let html = report.to_html();
//! assert!(html.contains("TestA::test_b"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod classify;
pub mod dispatch;
pub mod error;
pub mod feature;
pub mod log;
pub mod outcome;
pub mod report;
pub mod session;
pub mod status;
pub mod summary;

pub use classify::{classify, FailureCategory};
pub use dispatch::{Dispatcher, NoopDispatcher};
pub use error::{ReportError, ReportResult};
pub use feature::feature_key;
pub use log::{CapturedLog, LogLevel, RunLog, TracingLog};
pub use outcome::{TestEvent, TestOutcome};
pub use report::{FailureRow, FeatureRow, SummaryReport};
pub use session::{Reporter, ReporterOptions, RunObserver, RunSession, DEFAULT_PROJECT_NAME};
pub use status::{Phase, Status};
pub use summary::{aggregate_by_feature, pass_rate, FeatureSummary, StatusCounts};
