//! Outgoing report sink

use triax_protocol::Report;

/// Sink for protocol reports (replies and events)
///
/// The firmware encodes each report as a line on the serial channel; tests
/// collect reports for assertions.
pub trait Reporter {
    /// Deliver one report
    fn report(&mut self, report: Report);
}

impl<R: Reporter> Reporter for &mut R {
    fn report(&mut self, report: Report) {
        (**self).report(report)
    }
}
