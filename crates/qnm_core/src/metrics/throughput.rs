//! Throughput (T): the rate at which usable entanglement units reach the
//! application layer.

/// Calculate throughput as delivered units per unit of elapsed time.
///
/// Timestamps in this crate are nanoseconds, so the raw result is
/// units/ns; multiply by 1e9 for units/s (the aggregator does this).
///
/// # Edge cases
/// * `elapsed_ns <= 0.0` returns 0.0 — no division by zero, and a run
///   that never advanced the clock delivered nothing per unit time.
pub fn throughput(num_units: u64, elapsed_ns: f64) -> f64 {
    if elapsed_ns <= 0.0 {
        return 0.0;
    }
    num_units as f64 / elapsed_ns
}
