//! Stateless metric formulas for quantum network performance analysis.
//!
//! Every function here is a pure computation over plain numbers. Degenerate
//! inputs (empty slices, zero windows, zero quotas) resolve to defined
//! sentinel values rather than errors, so callers never need to special-case
//! their inputs before asking for a number.

pub mod fairness;
pub mod latency;
pub mod robustness;
pub mod throughput;

pub use fairness::fairness;
pub use latency::{request_latency, scaled_latency, unit_latency};
pub use robustness::{robustness, robustness_for, robustness_report, MetricPolarity};
pub use throughput::throughput;
