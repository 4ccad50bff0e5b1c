use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("request {0} is already active")]
    DuplicateRequest(u64),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("quantum state unavailable: {0}")]
    StateUnavailable(String),

    #[error("unknown metric type: {0} (expected throughput, fidelity, fairness or latency)")]
    InvalidMetricType(String),

    #[error("fidelity evaluator has no reference states")]
    EmptyReferenceSet,
}

pub type Result<T> = std::result::Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MetricsError::DuplicateRequest(7);
        assert_eq!(err.to_string(), "request 7 is already active");

        let err = MetricsError::InvalidMetricType("entropy".into());
        assert!(err.to_string().contains("entropy"));

        let err = MetricsError::EmptyReferenceSet;
        assert!(err.to_string().contains("reference states"));
    }
}
