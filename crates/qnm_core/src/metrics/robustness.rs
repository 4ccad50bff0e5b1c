//! # Robustness (RM)
//!
//! Sensitivity of a performance metric to degraded operating conditions,
//! expressed as a ratio between a baseline run and a degraded run. A ratio
//! close to 1.0 means the metric barely moved under degradation.

use std::collections::BTreeMap;

use crate::collector::MetricsSnapshot;
use crate::error::{MetricsError, Result};

/// Direction in which a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricPolarity {
    /// Throughput, fidelity, fairness: larger values are better.
    HigherIsBetter,
    /// Latency: smaller values are better.
    LowerIsBetter,
}

impl MetricPolarity {
    /// Resolve the polarity for a named metric family.
    ///
    /// Accepted names: `throughput`, `fidelity`, `fairness` (higher is
    /// better) and `latency` (lower is better). Anything else is an
    /// [`MetricsError::InvalidMetricType`] — fatal to this call only.
    pub fn for_metric(name: &str) -> Result<Self> {
        match name {
            "throughput" | "fidelity" | "fairness" => Ok(MetricPolarity::HigherIsBetter),
            "latency" => Ok(MetricPolarity::LowerIsBetter),
            other => Err(MetricsError::InvalidMetricType(other.to_string())),
        }
    }
}

/// Calculate the robustness ratio of one metric across two runs.
///
/// # Edge cases
/// * Higher-is-better with `baseline <= 0.0` returns 0.0 (nothing to be
///   robust about).
/// * Lower-is-better with `degraded <= 0.0` returns +INF (degraded run
///   reported an impossible latency).
///
/// # Examples
/// ```
/// use qnm_core::metrics::{robustness, MetricPolarity};
///
/// // 20% throughput loss under degradation
/// let r = robustness(100.0, 80.0, MetricPolarity::HigherIsBetter);
/// assert!((r - 0.8).abs() < 1e-12);
///
/// // 50% latency increase under degradation
/// let r = robustness(10.0, 15.0, MetricPolarity::LowerIsBetter);
/// assert!((r - 2.0 / 3.0).abs() < 1e-12);
/// ```
pub fn robustness(baseline: f64, degraded: f64, polarity: MetricPolarity) -> f64 {
    match polarity {
        MetricPolarity::HigherIsBetter => {
            if baseline <= 0.0 {
                0.0
            } else {
                degraded / baseline
            }
        }
        MetricPolarity::LowerIsBetter => {
            if degraded <= 0.0 {
                f64::INFINITY
            } else {
                baseline / degraded
            }
        }
    }
}

/// Named variant of [`robustness`] for callers holding a metric family
/// name instead of a polarity.
pub fn robustness_for(name: &str, baseline: f64, degraded: f64) -> Result<f64> {
    Ok(robustness(baseline, degraded, MetricPolarity::for_metric(name)?))
}

/// Compare a baseline snapshot against a degraded snapshot, metric by
/// metric.
///
/// Covers global throughput, mean fidelity (when both runs collected
/// samples), the three latency means and the three fairness indices. Keys
/// are `robustness_<metric>`; the map is ordered for stable reporting.
pub fn robustness_report(
    baseline: &MetricsSnapshot,
    degraded: &MetricsSnapshot,
) -> BTreeMap<String, f64> {
    let mut report = BTreeMap::new();

    report.insert(
        "robustness_throughput".to_string(),
        robustness(
            baseline.throughput,
            degraded.throughput,
            MetricPolarity::HigherIsBetter,
        ),
    );

    if let (Some(b), Some(d)) = (baseline.mean_fidelity, degraded.mean_fidelity) {
        report.insert(
            "robustness_fidelity".to_string(),
            robustness(b, d, MetricPolarity::HigherIsBetter),
        );
    }

    let latencies = [
        ("robustness_mean_request_latency", baseline.mean_request_latency, degraded.mean_request_latency),
        ("robustness_mean_unit_latency", baseline.mean_unit_latency, degraded.mean_unit_latency),
        ("robustness_mean_scaled_latency", baseline.mean_scaled_latency, degraded.mean_scaled_latency),
    ];
    for (key, b, d) in latencies {
        report.insert(key.to_string(), robustness(b, d, MetricPolarity::LowerIsBetter));
    }

    report.insert(
        "robustness_fairness_throughput".to_string(),
        robustness(
            baseline.fairness_throughput,
            degraded.fairness_throughput,
            MetricPolarity::HigherIsBetter,
        ),
    );
    report.insert(
        "robustness_fairness_latency".to_string(),
        robustness(
            baseline.fairness_latency,
            degraded.fairness_latency,
            MetricPolarity::HigherIsBetter,
        ),
    );
    if let (Some(b), Some(d)) = (baseline.fairness_fidelity, degraded.fairness_fidelity) {
        report.insert(
            "robustness_fairness_fidelity".to_string(),
            robustness(b, d, MetricPolarity::HigherIsBetter),
        );
    }

    report
}
