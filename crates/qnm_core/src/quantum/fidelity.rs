//! Fidelity scoring of delivered states against reference targets.

use crate::error::{MetricsError, Result};

use super::bell::bell_states;
use super::state::{DensityMatrix, RawState, StateVector};

/// Fidelity of a mixed state ρ against a pure reference |ψ⟩, computed as
/// the projector expectation value ⟨ψ|ρ|ψ⟩.
///
/// Clamped to [0, 1] against floating-point noise.
pub fn pure_fidelity(rho: &DensityMatrix, psi: &StateVector) -> f64 {
    let v = psi.vector();
    let expectation = (v.adjoint() * rho.matrix() * v)[(0, 0)];
    expectation.re.clamp(0.0, 1.0)
}

/// Generalized (Uhlmann) fidelity between two mixed states.
///
/// Computed from the eigenvalues of L†·σ·L where ρ = L·L† is the Cholesky
/// factorization: that product is cyclically equivalent to √ρ·σ·√ρ, so
/// F = (Σᵢ √λᵢ)². Negative eigenvalues from floating-point noise are
/// clamped to zero before the square roots.
///
/// A singular ρ (any pure or rank-deficient state) has no Cholesky factor
/// and is reported as `StateUnavailable`; rank-1 states belong on the
/// [`pure_fidelity`] path instead.
pub fn uhlmann_fidelity(rho: &DensityMatrix, sigma: &DensityMatrix) -> Result<f64> {
    let chol = rho.matrix().cholesky().ok_or_else(|| {
        MetricsError::StateUnavailable(
            "density matrix is singular, Cholesky factorization failed".to_string(),
        )
    })?;
    let l = chol.l();
    let product = l.adjoint() * sigma.matrix() * l;
    let eigenvalues = product.symmetric_eigen().eigenvalues;
    let sum: f64 = eigenvalues.iter().map(|&lam| lam.max(0.0).sqrt()).sum();
    Ok((sum * sum).clamp(0.0, 1.0))
}

/// A fidelity reference target: pure states use the projector expectation,
/// mixed states the Uhlmann fidelity.
#[derive(Debug, Clone)]
pub enum ReferenceState {
    Pure(StateVector),
    Mixed(DensityMatrix),
}

impl ReferenceState {
    pub fn fidelity(&self, rho: &DensityMatrix) -> Result<f64> {
        match self {
            ReferenceState::Pure(psi) => Ok(pure_fidelity(rho, psi)),
            ReferenceState::Mixed(sigma) => uhlmann_fidelity(rho, sigma),
        }
    }
}

/// Scores delivered states against a fixed reference target set and keeps
/// the best match.
///
/// The best-match score is a heuristic for "how close is this to *some*
/// usable entangled state", not a proof of which state was delivered. The
/// default target set is the four Bell states; because their projectors sum
/// to the identity, the best match over them is always at least 0.25.
#[derive(Debug, Clone)]
pub struct FidelityEvaluator {
    targets: Vec<ReferenceState>,
}

impl Default for FidelityEvaluator {
    fn default() -> Self {
        Self {
            targets: bell_states().into_iter().map(ReferenceState::Pure).collect(),
        }
    }
}

impl FidelityEvaluator {
    /// Evaluator with a custom reference set.
    pub fn new(targets: Vec<ReferenceState>) -> Result<Self> {
        if targets.is_empty() {
            return Err(MetricsError::EmptyReferenceSet);
        }
        Ok(Self { targets })
    }

    /// Validate a raw delivered state and score it against every target,
    /// returning the validated matrix and the best-match fidelity.
    ///
    /// Any failure — malformed matrix or an uncomputable target fidelity —
    /// is a `StateUnavailable` for the caller to drop the unit attempt on.
    pub fn evaluate(&self, raw: &RawState) -> Result<(DensityMatrix, f64)> {
        let rho = DensityMatrix::new(*raw)?;
        let mut best = 0.0f64;
        for target in &self.targets {
            best = best.max(target.fidelity(&rho)?);
        }
        Ok((rho, best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::bell::{PHI_PLUS, PSI_MINUS};

    #[test]
    fn test_pure_fidelity_of_matching_state_is_one() {
        let rho = PHI_PLUS.projector();
        assert!((pure_fidelity(&rho, &PHI_PLUS) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_werner_fidelity_formula() {
        // F(ρ_W(p), |Φ+⟩) = (3p + 1)/4
        for p in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let rho = DensityMatrix::werner(p);
            let f = pure_fidelity(&rho, &PHI_PLUS);
            assert!((f - (3.0 * p + 1.0) / 4.0).abs() < 1e-12, "p = {}", p);
        }
    }

    #[test]
    fn test_best_match_over_bell_basis() {
        let evaluator = FidelityEvaluator::default();

        // A Ψ− delivery scores 1.0 even though Φ+ sees it as orthogonal.
        let raw = *PSI_MINUS.projector().matrix();
        let (_, best) = evaluator.evaluate(&raw).unwrap();
        assert!((best - 1.0).abs() < 1e-12);

        // The maximally mixed state scores 0.25 against every Bell state.
        let raw = *DensityMatrix::maximally_mixed().matrix();
        let (_, best) = evaluator.evaluate(&raw).unwrap();
        assert!((best - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_rejects_malformed_state() {
        let evaluator = FidelityEvaluator::default();
        let raw = RawState::identity(); // trace 4, evaluation must fail
        assert!(matches!(
            evaluator.evaluate(&raw),
            Err(MetricsError::StateUnavailable(_))
        ));
    }

    #[test]
    fn test_uhlmann_identical_states() {
        let rho = DensityMatrix::werner(0.7);
        let f = uhlmann_fidelity(&rho, &rho).unwrap();
        assert!((f - 1.0).abs() < 1e-9, "got {}", f);
    }

    #[test]
    fn test_uhlmann_mixed_vs_mixed() {
        // F(I/4, ρ_W(p)) = (Σᵢ √(λᵢ/4))² with λ the Werner eigenvalues
        // (3p+1)/4 once and (1−p)/4 three times.
        let p = 0.6;
        let rho = DensityMatrix::maximally_mixed();
        let sigma = DensityMatrix::werner(p);
        let f = uhlmann_fidelity(&rho, &sigma).unwrap();
        let expected = (((3.0 * p + 1.0) / 16.0f64).sqrt()
            + 3.0 * ((1.0 - p) / 16.0f64).sqrt())
        .powi(2);
        assert!((f - expected).abs() < 1e-9, "got {}, expected {}", f, expected);
    }

    #[test]
    fn test_uhlmann_singular_rho_unavailable() {
        let rho = PHI_PLUS.projector(); // rank 1, not positive definite
        let sigma = DensityMatrix::maximally_mixed();
        assert!(matches!(
            uhlmann_fidelity(&rho, &sigma),
            Err(MetricsError::StateUnavailable(_))
        ));
    }

    #[test]
    fn test_mixed_reference_target() {
        let target = ReferenceState::Mixed(DensityMatrix::maximally_mixed());
        let evaluator = FidelityEvaluator::new(vec![target]).unwrap();
        let raw = *DensityMatrix::werner(0.5).matrix();
        // Mixed-target evaluation goes through the Uhlmann path. The raw
        // Werner state is full rank, so this must succeed.
        let (_, best) = evaluator.evaluate(&raw).unwrap();
        assert!(best > 0.0 && best <= 1.0);
    }

    #[test]
    fn test_empty_target_set_rejected() {
        assert!(matches!(
            FidelityEvaluator::new(vec![]),
            Err(MetricsError::EmptyReferenceSet)
        ));
    }
}
