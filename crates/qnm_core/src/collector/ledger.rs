//! The request ledger: exclusive owner of all in-flight request state.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{MetricsError, Result};
use crate::quantum::{DensityMatrix, FidelityEvaluator};

use super::request::{
    CompletedRequest, DeliveryEvent, DeliveryOutcome, PendingRequest, RequestDescriptor,
};

/// Accepted fidelity samples, kept globally and per node for the fairness
/// computation. One sample per accepted delivery that carried a state;
/// rejected and dropped deliveries contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct FidelitySamples {
    all: Vec<f64>,
    per_node: HashMap<String, Vec<f64>>,
}

impl FidelitySamples {
    pub(crate) fn record(&mut self, node_id: &str, fidelity: f64) {
        self.all.push(fidelity);
        self.per_node
            .entry(node_id.to_string())
            .or_default()
            .push(fidelity);
    }

    pub fn all(&self) -> &[f64] {
        &self.all
    }

    pub fn for_node(&self, node_id: &str) -> &[f64] {
        self.per_node.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Tracks every request from registration to quota completion.
///
/// Single-threaded by design: every mutation is a synchronous call from
/// the external event source, so there is no interior mutability and no
/// locking. Deliveries may interleave arbitrarily across requests and
/// units may arrive in any order within a request; only counts matter.
#[derive(Debug, Default)]
pub struct RequestLedger {
    active: HashMap<u64, PendingRequest>,
    completed: Vec<CompletedRequest>,
    evaluator: FidelityEvaluator,
    /// Minimum acceptable best-match fidelity; 0.0 disables rejection.
    fidelity_threshold: f64,
    samples: FidelitySamples,
    rejected_states: u64,
    unknown_deliveries: u64,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rejection threshold. Deliveries scoring below it are
    /// discarded and counted instead of accepted.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.fidelity_threshold = threshold;
        self
    }

    /// Replace the default Bell-basis evaluator.
    pub fn with_evaluator(mut self, evaluator: FidelityEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Register a new active request with zero completed units.
    ///
    /// Re-registering an id that is still active is a caller logic error
    /// and is rejected; ids of *completed* requests may be reused.
    pub fn record_request(&mut self, desc: RequestDescriptor, at_ns: f64) -> Result<()> {
        if desc.num_units == 0 {
            return Err(MetricsError::InvalidRequest(format!(
                "request {} asks for zero units",
                desc.request_id
            )));
        }
        if self.active.contains_key(&desc.request_id) {
            return Err(MetricsError::DuplicateRequest(desc.request_id));
        }
        debug!(
            request_id = desc.request_id,
            node_id = %desc.node_id,
            num_units = desc.num_units,
            "request registered"
        );
        self.active.insert(
            desc.request_id,
            PendingRequest {
                request_id: desc.request_id,
                node_id: desc.node_id,
                num_units: desc.num_units,
                request_time_ns: at_ns,
                completed_units: 0,
                delivered_states: Vec::new(),
            },
        );
        Ok(())
    }

    /// Record a delivered unit against its pending request.
    ///
    /// See [`DeliveryOutcome`] for the four possible results. Finalization
    /// runs exactly once per request: the active→completed transition is
    /// only reachable from the active map, so a later delivery for the
    /// same id lands in the unknown-request path.
    pub fn record_delivery(&mut self, event: DeliveryEvent, at_ns: f64) -> DeliveryOutcome {
        let Some(req) = self.active.get_mut(&event.request_id) else {
            // Known latent defect upstream: deliveries for unregistered ids
            // are dropped. Counted and logged so the loss is observable.
            self.unknown_deliveries += 1;
            warn!(
                request_id = event.request_id,
                unit_ref = event.unit_ref,
                "delivery for unknown request dropped"
            );
            return DeliveryOutcome::UnknownRequest;
        };

        let scored = match event.state.as_ref() {
            Some(raw) => match self.evaluator.evaluate(raw) {
                Ok((rho, fidelity)) => Some((rho, fidelity)),
                Err(err) => {
                    warn!(
                        request_id = event.request_id,
                        unit_ref = event.unit_ref,
                        %err,
                        "dropping unit attempt, state unavailable"
                    );
                    return DeliveryOutcome::StateUnavailable;
                }
            },
            None => None,
        };

        if let Some((_, fidelity)) = scored {
            if self.fidelity_threshold > 0.0 && fidelity < self.fidelity_threshold {
                self.rejected_states += 1;
                debug!(
                    request_id = event.request_id,
                    fidelity,
                    threshold = self.fidelity_threshold,
                    "state rejected below fidelity threshold"
                );
                return DeliveryOutcome::Rejected { fidelity };
            }
        }

        req.completed_units += 1;
        let fidelity = scored.map(|(rho, fidelity)| {
            self.samples.record(&req.node_id, fidelity);
            req.delivered_states.push(rho);
            fidelity
        });

        let completed = req.completed_units >= req.num_units;
        if completed {
            self.finalize(event.request_id, at_ns);
        }
        DeliveryOutcome::Accepted { fidelity, completed }
    }

    /// Move a quota-met request from the active map to the completed list.
    fn finalize(&mut self, request_id: u64, at_ns: f64) {
        let Some(req) = self.active.remove(&request_id) else {
            return;
        };
        debug!(
            request_id,
            node_id = %req.node_id,
            latency_ns = at_ns - req.request_time_ns,
            "request completed"
        );
        self.completed.push(CompletedRequest {
            request_id: req.request_id,
            node_id: req.node_id,
            num_units: req.num_units,
            request_time_ns: req.request_time_ns,
            completion_time_ns: at_ns,
            delivered_state: DensityMatrix::mean(&req.delivered_states),
        });
    }

    pub fn active_requests(&self) -> usize {
        self.active.len()
    }

    pub fn completed(&self) -> &[CompletedRequest] {
        &self.completed
    }

    pub fn samples(&self) -> &FidelitySamples {
        &self.samples
    }

    pub fn rejected_states(&self) -> u64 {
        self.rejected_states
    }

    pub fn unknown_deliveries(&self) -> u64 {
        self.unknown_deliveries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::{DensityMatrix, RawState};

    fn delivery(request_id: u64, unit_ref: u64, state: Option<RawState>) -> DeliveryEvent {
        DeliveryEvent { request_id, unit_ref, state }
    }

    fn good_state() -> RawState {
        *DensityMatrix::werner(0.9).matrix()
    }

    #[test]
    fn test_completion_in_any_unit_order() {
        // Quota 3, units delivered as 2, 0, 1: order must not matter.
        for unit_order in [[0u64, 1, 2], [2, 0, 1], [1, 2, 0]] {
            let mut ledger = RequestLedger::new();
            ledger
                .record_request(RequestDescriptor::new(1, "alice", 3), 100.0)
                .unwrap();

            for (i, unit_ref) in unit_order.into_iter().enumerate() {
                let at = 200.0 + i as f64;
                let outcome = ledger.record_delivery(delivery(1, unit_ref, Some(good_state())), at);
                let expect_done = i == 2;
                assert!(
                    matches!(outcome, DeliveryOutcome::Accepted { completed, .. } if completed == expect_done)
                );
            }

            assert_eq!(ledger.active_requests(), 0);
            assert_eq!(ledger.completed().len(), 1);
            let req = &ledger.completed()[0];
            assert_eq!(req.completion_time_ns, 202.0);
            assert!(req.delivered_state.is_some());

            // A fourth delivery cannot re-finalize; the request left the
            // active set.
            let outcome = ledger.record_delivery(delivery(1, 3, Some(good_state())), 300.0);
            assert_eq!(outcome, DeliveryOutcome::UnknownRequest);
            assert_eq!(ledger.completed().len(), 1);
        }
    }

    #[test]
    fn test_duplicate_request_rejected() {
        let mut ledger = RequestLedger::new();
        ledger
            .record_request(RequestDescriptor::new(7, "alice", 1), 0.0)
            .unwrap();
        let err = ledger
            .record_request(RequestDescriptor::new(7, "bob", 2), 1.0)
            .unwrap_err();
        assert!(matches!(err, MetricsError::DuplicateRequest(7)));

        // After completion the id may be reused.
        ledger.record_delivery(delivery(7, 0, None), 2.0);
        assert!(ledger.record_request(RequestDescriptor::new(7, "bob", 1), 3.0).is_ok());
    }

    #[test]
    fn test_zero_unit_request_rejected() {
        let mut ledger = RequestLedger::new();
        let err = ledger
            .record_request(RequestDescriptor::new(1, "alice", 0), 0.0)
            .unwrap_err();
        assert!(matches!(err, MetricsError::InvalidRequest(_)));
    }

    #[test]
    fn test_threshold_rejection() {
        let mut ledger = RequestLedger::new().with_threshold(0.5);
        ledger
            .record_request(RequestDescriptor::new(1, "alice", 2), 0.0)
            .unwrap();

        // Werner p such that the best Bell match is 0.3: (3p+1)/4 = 0.3.
        let weak = *DensityMatrix::werner(0.2 / 3.0).matrix();
        let outcome = ledger.record_delivery(delivery(1, 0, Some(weak)), 10.0);
        assert!(matches!(
            outcome,
            DeliveryOutcome::Rejected { fidelity } if (fidelity - 0.3).abs() < 1e-9
        ));
        assert_eq!(ledger.rejected_states(), 1);
        assert_eq!(ledger.active_requests(), 1);
        assert!(ledger.samples().is_empty());

        // A strong state still counts afterwards.
        let outcome = ledger.record_delivery(delivery(1, 0, Some(good_state())), 20.0);
        assert!(matches!(
            outcome,
            DeliveryOutcome::Accepted { fidelity: Some(_), completed: false }
        ));
        assert_eq!(ledger.samples().all().len(), 1);
    }

    #[test]
    fn test_unknown_request_is_counted_not_crashed() {
        let mut ledger = RequestLedger::new();
        let outcome = ledger.record_delivery(delivery(99, 0, Some(good_state())), 1.0);
        assert_eq!(outcome, DeliveryOutcome::UnknownRequest);
        assert_eq!(ledger.unknown_deliveries(), 1);
        assert_eq!(ledger.completed().len(), 0);
    }

    #[test]
    fn test_absent_state_counts_without_sample() {
        let mut ledger = RequestLedger::new();
        ledger
            .record_request(RequestDescriptor::new(1, "alice", 1), 0.0)
            .unwrap();
        let outcome = ledger.record_delivery(delivery(1, 0, None), 5.0);
        assert!(matches!(
            outcome,
            DeliveryOutcome::Accepted { fidelity: None, completed: true }
        ));
        assert!(ledger.samples().is_empty());
        assert!(ledger.completed()[0].delivered_state.is_none());
    }

    #[test]
    fn test_malformed_state_drops_unit() {
        let mut ledger = RequestLedger::new();
        ledger
            .record_request(RequestDescriptor::new(1, "alice", 1), 0.0)
            .unwrap();
        let outcome = ledger.record_delivery(delivery(1, 0, Some(RawState::identity())), 5.0);
        assert_eq!(outcome, DeliveryOutcome::StateUnavailable);
        // Dropped without counting or rejecting.
        assert_eq!(ledger.active_requests(), 1);
        assert_eq!(ledger.rejected_states(), 0);
        assert!(ledger.samples().is_empty());
    }

    #[test]
    fn test_interleaved_requests() {
        let mut ledger = RequestLedger::new();
        ledger
            .record_request(RequestDescriptor::new(1, "alice", 2), 0.0)
            .unwrap();
        ledger
            .record_request(RequestDescriptor::new(2, "bob", 2), 0.0)
            .unwrap();

        ledger.record_delivery(delivery(2, 0, Some(good_state())), 10.0);
        ledger.record_delivery(delivery(1, 1, Some(good_state())), 20.0);
        ledger.record_delivery(delivery(1, 0, Some(good_state())), 30.0);
        ledger.record_delivery(delivery(2, 1, Some(good_state())), 40.0);

        assert_eq!(ledger.active_requests(), 0);
        assert_eq!(ledger.completed().len(), 2);
        assert_eq!(ledger.samples().for_node("alice").len(), 2);
        assert_eq!(ledger.samples().for_node("bob").len(), 2);
    }

    #[test]
    fn test_state_averaging_on_completion() {
        let mut ledger = RequestLedger::new();
        ledger
            .record_request(RequestDescriptor::new(1, "alice", 2), 0.0)
            .unwrap();
        ledger.record_delivery(delivery(1, 0, Some(*DensityMatrix::werner(1.0).matrix())), 1.0);
        ledger.record_delivery(delivery(1, 1, Some(*DensityMatrix::werner(0.0).matrix())), 2.0);

        let avg = ledger.completed()[0].delivered_state.unwrap();
        let expected = DensityMatrix::werner(0.5);
        assert!((avg.matrix() - expected.matrix()).norm() < 1e-12);
    }
}
