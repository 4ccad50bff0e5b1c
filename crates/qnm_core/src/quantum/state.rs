//! Validated two-qubit state containers.

use nalgebra::{Complex, Matrix4, Vector4};

use crate::error::{MetricsError, Result};

/// Raw, unvalidated 4x4 complex matrix as handed over by the event source.
///
/// Validation happens at fidelity-evaluation time so a malformed payload
/// surfaces as a `StateUnavailable` delivery outcome instead of poisoning
/// the ledger.
pub type RawState = Matrix4<Complex<f64>>;

/// Tolerance for the Hermitian symmetry check.
const HERMITIAN_TOL: f64 = 1e-9;
/// Tolerance for the unit-trace check.
const TRACE_TOL: f64 = 1e-6;

/// A normalized two-qubit pure state |ψ⟩ in the computational basis
/// (|00⟩, |01⟩, |10⟩, |11⟩).
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector(Vector4<Complex<f64>>);

impl StateVector {
    /// Build a pure state, normalizing the amplitudes.
    ///
    /// A zero vector cannot be normalized and is reported as
    /// `StateUnavailable`.
    pub fn new(amplitudes: Vector4<Complex<f64>>) -> Result<Self> {
        let norm = amplitudes.norm();
        if norm == 0.0 {
            return Err(MetricsError::StateUnavailable(
                "zero-norm state vector".to_string(),
            ));
        }
        Ok(Self(amplitudes.unscale(norm)))
    }

    /// Real-amplitude convenience constructor (covers the Bell basis).
    pub fn from_reals(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        Self::new(Vector4::new(
            Complex::new(a, 0.0),
            Complex::new(b, 0.0),
            Complex::new(c, 0.0),
            Complex::new(d, 0.0),
        ))
    }

    pub fn vector(&self) -> &Vector4<Complex<f64>> {
        &self.0
    }

    /// The projector |ψ⟩⟨ψ| as a density matrix.
    pub fn projector(&self) -> DensityMatrix {
        DensityMatrix(self.0 * self.0.adjoint())
    }
}

/// A validated two-qubit density matrix: Hermitian with unit trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityMatrix(Matrix4<Complex<f64>>);

impl DensityMatrix {
    /// Validate a raw matrix into a density matrix.
    pub fn new(raw: RawState) -> Result<Self> {
        let asymmetry = (raw - raw.adjoint()).norm();
        if asymmetry > HERMITIAN_TOL {
            return Err(MetricsError::StateUnavailable(format!(
                "matrix is not Hermitian (asymmetry {:.3e})",
                asymmetry
            )));
        }
        let trace = raw.trace();
        let trace_excess = trace - Complex::new(1.0, 0.0);
        if trace_excess.re.hypot(trace_excess.im) > TRACE_TOL {
            return Err(MetricsError::StateUnavailable(format!(
                "matrix trace is {:.6} + {:.6}i, expected 1",
                trace.re, trace.im
            )));
        }
        Ok(Self(raw))
    }

    /// The maximally mixed two-qubit state I/4.
    pub fn maximally_mixed() -> Self {
        Self(Matrix4::identity().unscale(4.0))
    }

    /// Werner state: p·|Φ+⟩⟨Φ+| + (1−p)·I/4.
    ///
    /// The standard single-parameter noise model for entangled-pair
    /// delivery; its fidelity against |Φ+⟩ is (3p+1)/4.
    pub fn werner(p: f64) -> Self {
        let p = p.clamp(0.0, 1.0);
        let signal = super::bell::PHI_PLUS.projector().0;
        let noise = Matrix4::identity().unscale(4.0);
        Self(signal.scale(p) + noise.scale(1.0 - p))
    }

    /// Arithmetic mean of a non-empty set of density matrices.
    ///
    /// A convex combination of density matrices is itself a density
    /// matrix, so no re-validation is needed.
    pub fn mean(states: &[DensityMatrix]) -> Option<Self> {
        if states.is_empty() {
            return None;
        }
        let sum = states
            .iter()
            .fold(Matrix4::zeros(), |acc, s| acc + s.0);
        Some(Self(sum.unscale(states.len() as f64)))
    }

    pub fn matrix(&self) -> &Matrix4<Complex<f64>> {
        &self.0
    }
}
