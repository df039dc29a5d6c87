//! # evalreport-evals
//!
//! Metric threshold checks, parameterized datasets and a suite runner that
//! feeds evaluation outcomes into an [`evalreport_core::RunObserver`].
//!
//! Metric computation itself is external: implement [`MetricScorer`] on top
//! of whatever evaluation library and chat API the harness talks to.
//!
//! ## Example
//!
//! ```ignore
//! use evalreport_evals::prelude::*;
//!
//! let dataset: Dataset<RagSample> = Dataset::load_feature(".", "chatbot")?;
//! let suite = EvalSuite::new("tests/test_chatbot.py")
//!     .class("TestChatbot")
//!     .parametrize("test_faithfulness", MetricKind::Faithfulness, &dataset);
//!
//! let results = SuiteRunner::new()
//!     .options(RunOptions::new().timeout(Duration::from_secs(60)))
//!     .run(&suite, &my_scorer, &mut reporter)
//!     .await;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod case;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod metric;
pub mod runner;
pub mod suite;

pub use case::Case;
pub use dataset::{feature_path, Dataset, RagSample};
pub use error::{EvalError, EvalResult};
pub use evaluator::{EvaluationResult, FunctionScorer, MetricScorer};
pub use metric::{Comparison, MetricKind, Threshold};
pub use runner::{CaseResult, RunOptions, SuiteRunner};
pub use suite::EvalSuite;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Case, CaseResult, Dataset, EvalError, EvalResult, EvalSuite, EvaluationResult,
        FunctionScorer, MetricKind, MetricScorer, RagSample, RunOptions, SuiteRunner, Threshold,
    };
}
