//! Delivery of rendered summaries.

use crate::report::SummaryReport;

/// Sends a rendered summary somewhere.
///
/// Implementations absorb their own failures: a dispatcher logs problems and
/// returns normally so the host run is never aborted by reporting.
pub trait Dispatcher {
    /// Deliver the report. Best effort, single attempt.
    fn dispatch(&self, report: &SummaryReport);
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn dispatch(&self, report: &SummaryReport) {
        (**self).dispatch(report);
    }
}

/// Dispatcher that drops the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatcher;

impl Dispatcher for NoopDispatcher {
    fn dispatch(&self, _report: &SummaryReport) {
        tracing::debug!("Report dispatch disabled");
    }
}
