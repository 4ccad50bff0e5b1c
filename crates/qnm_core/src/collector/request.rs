//! Request lifecycle types and delivery events.

use crate::quantum::{DensityMatrix, RawState};

/// Registration record for a new entanglement request, as submitted by the
/// requesting node.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub request_id: u64,
    pub node_id: String,
    /// Unit quota; must be at least 1.
    pub num_units: u32,
}

impl RequestDescriptor {
    pub fn new(request_id: u64, node_id: impl Into<String>, num_units: u32) -> Self {
        Self {
            request_id,
            node_id: node_id.into(),
            num_units,
        }
    }
}

/// One "unit delivered" event from the simulation.
///
/// The payload is the raw state as retrieved from the delivering node's
/// memory, or `None` when the state could not be retrieved at all.
/// Validation happens inside the ledger so malformed payloads surface as a
/// [`DeliveryOutcome::StateUnavailable`] instead of an upfront panic.
#[derive(Debug, Clone)]
pub struct DeliveryEvent {
    pub request_id: u64,
    /// Logical slot reference for the delivered unit. Arrival order is
    /// irrelevant to the ledger; this is carried for tracing only.
    pub unit_ref: u64,
    pub state: Option<RawState>,
}

/// Named outcome of recording one delivery. Every drop path is observable
/// so tests (and operators) can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeliveryOutcome {
    /// The unit counted toward the quota. `fidelity` is `None` when the
    /// event carried no state; `completed` is set when this delivery met
    /// the quota and finalized the request.
    Accepted { fidelity: Option<f64>, completed: bool },
    /// Best-match fidelity fell below the configured threshold; the unit
    /// attempt was discarded.
    Rejected { fidelity: f64 },
    /// The state payload was malformed or its fidelity could not be
    /// computed; the unit attempt was dropped without counting.
    StateUnavailable,
    /// No active request carries this id. The event is dropped with no
    /// state change beyond the unknown-deliveries counter.
    UnknownRequest,
}

/// A registered request that has not yet met its unit quota.
///
/// Owned exclusively by the ledger; mutated only by `record_delivery`.
#[derive(Debug, Clone)]
pub(crate) struct PendingRequest {
    pub request_id: u64,
    pub node_id: String,
    pub num_units: u32,
    pub request_time_ns: f64,
    pub completed_units: u32,
    /// Accepted states in arrival order, for completion-time averaging.
    pub delivered_states: Vec<DensityMatrix>,
}

/// A request whose quota has been met. Immutable from finalization on.
#[derive(Debug, Clone)]
pub struct CompletedRequest {
    pub request_id: u64,
    pub node_id: String,
    pub num_units: u32,
    pub request_time_ns: f64,
    pub completion_time_ns: f64,
    /// Mean of the accepted delivered states, when any carried a state.
    pub delivered_state: Option<DensityMatrix>,
}

impl CompletedRequest {
    /// Lr: completion minus submission, in nanoseconds.
    pub fn request_latency_ns(&self) -> f64 {
        crate::metrics::request_latency(self.completion_time_ns, self.request_time_ns)
    }
}
