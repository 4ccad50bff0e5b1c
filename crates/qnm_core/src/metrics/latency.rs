//! Latency metrics: request latency (Lr), unit latency (Lu) and scaled
//! latency (Ls), all in nanoseconds.

/// Request latency (Lr): time from request submission to the completion of
/// its full unit quota, including queuing, generation attempts and
/// classical signaling.
pub fn request_latency(completion_ns: f64, request_ns: f64) -> f64 {
    completion_ns - request_ns
}

/// Unit latency (Lu): mean time per delivered entanglement unit.
///
/// `num_units <= 0` returns +INF (an empty quota never finishes a unit).
pub fn unit_latency(total_ns: f64, num_units: u32) -> f64 {
    if num_units == 0 {
        return f64::INFINITY;
    }
    total_ns / num_units as f64
}

/// Scaled latency (Ls): request latency normalized by the unit quota,
/// Ls = Lr / Nu.
///
/// With only request-level timestamps available this coincides with
/// [`unit_latency`] computed from Lr. The two are kept as separate named
/// metrics because Ls is defined to absorb scheduling and congestion
/// effects, which a future per-unit timing source would split apart.
pub fn scaled_latency(request_latency_ns: f64, num_units: u32) -> f64 {
    if num_units == 0 {
        return f64::INFINITY;
    }
    request_latency_ns / num_units as f64
}
