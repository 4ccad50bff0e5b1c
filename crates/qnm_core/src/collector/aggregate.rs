//! Aggregation of completed requests into a [`MetricsSnapshot`].

use std::collections::BTreeMap;

use crate::metrics::{fairness, scaled_latency, throughput, unit_latency};

use super::ledger::FidelitySamples;
use super::request::CompletedRequest;
use super::snapshot::{MetricsSnapshot, NodeMetrics};

const NS_PER_SEC: f64 = 1e9;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Per-node accumulation scratch while walking the completed list.
#[derive(Debug)]
struct NodeAccumulator {
    units: u64,
    latencies: Vec<f64>,
    first_request_ns: f64,
    last_completion_ns: f64,
}

impl NodeAccumulator {
    fn new() -> Self {
        Self {
            units: 0,
            latencies: Vec::new(),
            first_request_ns: f64::INFINITY,
            last_completion_ns: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, req: &CompletedRequest) {
        self.units += u64::from(req.num_units);
        self.latencies.push(req.request_latency_ns());
        self.first_request_ns = self.first_request_ns.min(req.request_time_ns);
        self.last_completion_ns = self.last_completion_ns.max(req.completion_time_ns);
    }

    /// Units per second over the node's active window (last completion
    /// minus first request). A zero or negative window yields 0.0.
    fn throughput_per_sec(&self) -> f64 {
        throughput(self.units, self.last_completion_ns - self.first_request_ns) * NS_PER_SEC
    }
}

/// Aggregate a run's completed requests and fidelity samples into the
/// immutable snapshot.
///
/// Fairness is computed over *per-node* values (one entry per node), not
/// over raw per-request values: it measures equality across participants,
/// not variance across transactions.
pub fn aggregate(
    completed: &[CompletedRequest],
    samples: &FidelitySamples,
    rejected_states: u64,
    unknown_deliveries: u64,
    simulation_time_ns: f64,
) -> MetricsSnapshot {
    if completed.is_empty() {
        let mut snap = MetricsSnapshot::empty(simulation_time_ns);
        snap.rejected_states = rejected_states;
        snap.unknown_deliveries = unknown_deliveries;
        return snap;
    }

    let mut request_latencies = Vec::with_capacity(completed.len());
    let mut unit_latencies = Vec::with_capacity(completed.len());
    let mut scaled_latencies = Vec::with_capacity(completed.len());
    let mut total_units: u64 = 0;
    let mut nodes: BTreeMap<&str, NodeAccumulator> = BTreeMap::new();

    for req in completed {
        let lr = req.request_latency_ns();
        request_latencies.push(lr);
        unit_latencies.push(unit_latency(lr, req.num_units));
        scaled_latencies.push(scaled_latency(lr, req.num_units));
        total_units += u64::from(req.num_units);
        nodes
            .entry(req.node_id.as_str())
            .or_insert_with(NodeAccumulator::new)
            .add(req);
    }

    let mut per_node = BTreeMap::new();
    let mut node_throughputs = Vec::with_capacity(nodes.len());
    let mut node_latencies = Vec::with_capacity(nodes.len());
    let mut node_fidelities = Vec::new();

    for (node_id, acc) in &nodes {
        let node_throughput = acc.throughput_per_sec();
        let node_latency = mean(&acc.latencies);
        node_throughputs.push(node_throughput);
        node_latencies.push(node_latency);

        let node_samples = samples.for_node(node_id);
        let avg_fidelity = if node_samples.is_empty() {
            None
        } else {
            let f = mean(node_samples);
            node_fidelities.push(f);
            Some(f)
        };

        per_node.insert(
            node_id.to_string(),
            NodeMetrics {
                throughput: node_throughput,
                avg_latency: node_latency,
                total_units: acc.units,
                avg_fidelity,
            },
        );
    }

    let mean_fidelity = if samples.is_empty() {
        None
    } else {
        Some(mean(samples.all()))
    };
    let fairness_fidelity = if node_fidelities.is_empty() {
        None
    } else {
        Some(fairness(&node_fidelities))
    };

    MetricsSnapshot {
        throughput: throughput(total_units, simulation_time_ns) * NS_PER_SEC,
        mean_request_latency: mean(&request_latencies),
        mean_unit_latency: mean(&unit_latencies),
        mean_scaled_latency: mean(&scaled_latencies),
        mean_fidelity,
        fairness_throughput: fairness(&node_throughputs),
        fairness_latency: fairness(&node_latencies),
        fairness_fidelity,
        rejected_states,
        unknown_deliveries,
        per_node,
        simulation_time_ns,
        total_requests: completed.len(),
    }
}
