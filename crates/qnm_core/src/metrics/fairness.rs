//! # Jain's Fairness Index
//!
//! Measures how equally a resource is distributed across participants:
//! - 1.0 = perfect equality (every node gets the same share)
//! - 1/n = maximum inequality (one node gets everything)
//!
//! The index is resource-type independent: it is applied here to per-node
//! throughput, per-node mean latency and per-node mean fidelity.

/// Calculate Jain's fairness index over a set of per-node metric values.
///
/// J = (Σxᵢ)² / (n·Σxᵢ²)
///
/// # Edge cases
/// * Empty input is vacuously fair: returns 1.0 (defined, not computed).
/// * All-zero input is treated as perfect equality: returns 1.0.
///
/// # Examples
/// ```
/// use qnm_core::metrics::fairness;
///
/// assert_eq!(fairness(&[100.0, 100.0, 100.0]), 1.0);
/// assert!((fairness(&[100.0, 0.0]) - 0.5).abs() < 1e-12);
/// assert_eq!(fairness(&[]), 1.0);
/// ```
pub fn fairness(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 1.0;
    }

    let sum: f64 = values.iter().sum();
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    if sum_sq == 0.0 {
        return 1.0;
    }

    // Clamp to [0, 1] to absorb floating-point noise on near-equal inputs.
    ((sum * sum) / (n as f64 * sum_sq)).clamp(0.0, 1.0)
}
