//! Event collection and aggregation for one simulation run.
//!
//! The [`RequestLedger`] owns request lifecycle state and is fed
//! synchronously by the external discrete-event simulation; the
//! [`MetricsCollector`] wraps a ledger together with the simulation time
//! window and produces the run's [`MetricsSnapshot`].

pub mod aggregate;
pub mod ledger;
pub mod request;
pub mod retrieval;
pub mod snapshot;

pub use aggregate::aggregate;
pub use ledger::{FidelitySamples, RequestLedger};
pub use request::{CompletedRequest, DeliveryEvent, DeliveryOutcome, RequestDescriptor};
pub use retrieval::{FallbackRetriever, StateRetriever};
pub use snapshot::{MetricsSnapshot, NodeMetrics};

use crate::error::Result;
use crate::quantum::FidelityEvaluator;

/// Ledger plus simulation window: the full per-run collection surface.
///
/// All timestamps come from the caller's monotonic simulation clock, in
/// nanoseconds; the collector never reads an ambient clock of its own.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    ledger: RequestLedger,
    start_time_ns: f64,
    end_time_ns: Option<f64>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject deliveries whose best-match fidelity falls below `threshold`.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.ledger = self.ledger.with_threshold(threshold);
        self
    }

    /// Replace the default Bell-basis fidelity evaluator.
    pub fn with_evaluator(mut self, evaluator: FidelityEvaluator) -> Self {
        self.ledger = self.ledger.with_evaluator(evaluator);
        self
    }

    /// Mark the start of the simulation window.
    pub fn start(&mut self, at_ns: f64) {
        self.start_time_ns = at_ns;
    }

    /// Mark the end of the simulation window.
    pub fn finish(&mut self, at_ns: f64) {
        self.end_time_ns = Some(at_ns);
    }

    /// See [`RequestLedger::record_request`].
    pub fn record_request(&mut self, desc: RequestDescriptor, at_ns: f64) -> Result<()> {
        self.ledger.record_request(desc, at_ns)
    }

    /// See [`RequestLedger::record_delivery`].
    pub fn record_delivery(&mut self, event: DeliveryEvent, at_ns: f64) -> DeliveryOutcome {
        self.ledger.record_delivery(event, at_ns)
    }

    pub fn ledger(&self) -> &RequestLedger {
        &self.ledger
    }

    /// Aggregate everything collected so far into an immutable snapshot.
    ///
    /// An unfinished window has zero duration, so global throughput reads
    /// 0.0 until [`finish`](Self::finish) is called.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let end = self.end_time_ns.unwrap_or(self.start_time_ns);
        aggregate(
            self.ledger.completed(),
            self.ledger.samples(),
            self.ledger.rejected_states(),
            self.ledger.unknown_deliveries(),
            end - self.start_time_ns,
        )
    }
}
