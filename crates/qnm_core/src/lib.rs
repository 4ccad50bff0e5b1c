//! # qnm_core - Quantum Network Metrics Engine
//!
//! Turns a stream of asynchronous, out-of-order "unit delivered" events
//! from a quantum-network simulation into statistically sound performance
//! measures: throughput, end-to-end fidelity, request/unit/scaled latency,
//! Jain's fairness across nodes, and robustness ratios between a baseline
//! and a degraded run.
//!
//! ## Features
//! - Request ledger with partial-completion and threshold-rejection
//!   semantics, tolerant of arbitrary event interleaving
//! - Bell-basis best-match fidelity scoring of delivered density matrices
//! - Per-request, per-node and global aggregate statistics with defined
//!   sentinel values for every degenerate input
//! - Deterministic output: same event stream = same snapshot
//!
//! The simulation itself is an external collaborator: this crate consumes
//! its events and timestamps and produces derived statistics, nothing else.

pub mod collector;
pub mod error;
pub mod metrics;
pub mod quantum;

// Re-export the main collection surface
pub use collector::{
    aggregate, CompletedRequest, DeliveryEvent, DeliveryOutcome, FallbackRetriever,
    FidelitySamples, MetricsCollector, MetricsSnapshot, NodeMetrics, RequestDescriptor,
    RequestLedger, StateRetriever,
};
pub use error::{MetricsError, Result};

// Re-export the formula library and fidelity evaluation
pub use metrics::{
    fairness, request_latency, robustness, robustness_report, scaled_latency, throughput,
    unit_latency, MetricPolarity,
};
pub use quantum::{DensityMatrix, FidelityEvaluator, RawState, ReferenceState, StateVector};
