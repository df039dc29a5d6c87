//! # evalreport
//!
//! Feature-level summaries and email reports for LLM evaluation runs.
//!
//! A test runner reports each case's phases to a [`Harness`]. When the run is
//! over, the harness groups outcomes by feature, classifies failures, renders
//! an HTML summary and emails it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use evalreport::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     evalreport::logging::init();
//!
//!     let dataset: Dataset<RagSample> = Dataset::load_feature(".", "chatbot")?;
//!     let suite = EvalSuite::new("tests/test_chatbot.py")
//!         .class("TestChatbot")
//!         .parametrize("test_faithfulness", MetricKind::Faithfulness, &dataset);
//!
//!     let mut harness = Harness::from_env();
//!     SuiteRunner::new().run(&suite, &MyScorer::new(), &mut harness).await;
//!     let report = harness.finish()?;
//!     println!("{}", report.to_text());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `mail` | SMTP dispatch of the summary | ✅ |
//! | `evals` | Metric thresholds, datasets and the suite runner | ✅ |
//! | `full` | All features | ❌ |
//!
//! ## Architecture
//!
//! - [`evalreport_core`] - Outcomes, aggregation, failure classification, rendering
//! - `evalreport_mail` - SMTP dispatcher (optional)
//! - `evalreport_evals` - Evaluation runner (optional)

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod harness;
pub mod logging;

pub use evalreport_core as core;

#[cfg(feature = "mail")]
#[cfg_attr(docsrs, doc(cfg(feature = "mail")))]
pub use evalreport_mail as mail;

#[cfg(feature = "evals")]
#[cfg_attr(docsrs, doc(cfg(feature = "evals")))]
pub use evalreport_evals as evals;

pub use evalreport_core::{
    CapturedLog, Dispatcher, FailureCategory, LogLevel, NoopDispatcher, ReportError, Reporter,
    ReporterOptions, RunLog, RunObserver, Status, SummaryReport, TestEvent, TracingLog,
};
pub use harness::{Harness, HarnessError, HarnessResult};

#[cfg(feature = "mail")]
pub use evalreport_mail::{EmailDispatcher, MailConfig};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::harness::{Harness, HarnessError, HarnessResult};
    pub use evalreport_core::{
        Dispatcher, NoopDispatcher, Phase, ReporterOptions, RunLog, RunObserver, Status,
        SummaryReport, TestEvent, TracingLog,
    };

    #[cfg(feature = "mail")]
    pub use evalreport_mail::{EmailDispatcher, MailConfig};

    #[cfg(feature = "evals")]
    pub use evalreport_evals::prelude::*;
}
