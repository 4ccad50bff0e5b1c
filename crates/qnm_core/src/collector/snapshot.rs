//! Immutable aggregate output of a simulation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-node breakdown inside a [`MetricsSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    /// Delivered units per second over the node's active window.
    pub throughput: f64,
    /// Mean request latency for the node's completed requests, ns.
    pub avg_latency: f64,
    /// Total units delivered across the node's completed requests.
    pub total_units: u64,
    /// Mean accepted fidelity; absent when the node produced no samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_fidelity: Option<f64>,
}

/// All derived statistics for one run. Produced once by the aggregator and
/// never mutated afterwards.
///
/// Fidelity-derived fields are `Option` and are *omitted*, not
/// zero-filled, when a run collected no samples — a run that never saw a
/// state has no fidelity, which is different from fidelity zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Global delivered units per second over the simulation window.
    pub throughput: f64,
    /// Mean Lr across completed requests, ns.
    pub mean_request_latency: f64,
    /// Mean Lu across completed requests, ns.
    pub mean_unit_latency: f64,
    /// Mean Ls across completed requests, ns.
    pub mean_scaled_latency: f64,
    /// Mean of all accepted fidelity samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_fidelity: Option<f64>,
    /// Jain's index over per-node throughput.
    pub fairness_throughput: f64,
    /// Jain's index over per-node mean latency.
    pub fairness_latency: f64,
    /// Jain's index over per-node mean fidelity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fairness_fidelity: Option<f64>,
    /// States discarded by the fidelity threshold.
    pub rejected_states: u64,
    /// Deliveries dropped because no active request carried their id.
    pub unknown_deliveries: u64,
    /// Per-node breakdown, ordered by node id for stable output.
    pub per_node: BTreeMap<String, NodeMetrics>,
    /// End minus start of the simulation window, ns.
    pub simulation_time_ns: f64,
    /// Number of completed requests.
    pub total_requests: usize,
}

impl MetricsSnapshot {
    /// The defined result for a run with zero completed requests: rates and
    /// latencies at zero, fairness vacuously 1.0, fidelity absent.
    pub fn empty(simulation_time_ns: f64) -> Self {
        Self {
            throughput: 0.0,
            mean_request_latency: 0.0,
            mean_unit_latency: 0.0,
            mean_scaled_latency: 0.0,
            mean_fidelity: None,
            fairness_throughput: 1.0,
            fairness_latency: 1.0,
            fairness_fidelity: None,
            rejected_states: 0,
            unknown_deliveries: 0,
            per_node: BTreeMap::new(),
            simulation_time_ns,
            total_requests: 0,
        }
    }
}
