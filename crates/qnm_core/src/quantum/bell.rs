//! The four maximally-entangled two-qubit Bell states, used as the default
//! fidelity reference set.

use std::f64::consts::FRAC_1_SQRT_2;

use once_cell::sync::Lazy;

use super::state::StateVector;

fn bell(a: f64, b: f64, c: f64, d: f64) -> StateVector {
    // Amplitudes are ±1/√2, so normalization cannot fail.
    StateVector::from_reals(a, b, c, d).unwrap_or_else(|_| unreachable!())
}

/// |Φ+⟩ = (|00⟩ + |11⟩)/√2
pub static PHI_PLUS: Lazy<StateVector> =
    Lazy::new(|| bell(FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2));

/// |Φ−⟩ = (|00⟩ − |11⟩)/√2
pub static PHI_MINUS: Lazy<StateVector> =
    Lazy::new(|| bell(FRAC_1_SQRT_2, 0.0, 0.0, -FRAC_1_SQRT_2));

/// |Ψ+⟩ = (|01⟩ + |10⟩)/√2
pub static PSI_PLUS: Lazy<StateVector> =
    Lazy::new(|| bell(0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0));

/// |Ψ−⟩ = (|01⟩ − |10⟩)/√2
pub static PSI_MINUS: Lazy<StateVector> =
    Lazy::new(|| bell(0.0, FRAC_1_SQRT_2, -FRAC_1_SQRT_2, 0.0));

/// The full Bell basis, in Φ+, Φ−, Ψ+, Ψ− order.
pub fn bell_states() -> [StateVector; 4] {
    [
        PHI_PLUS.clone(),
        PHI_MINUS.clone(),
        PSI_PLUS.clone(),
        PSI_MINUS.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantum::fidelity::pure_fidelity;

    #[test]
    fn test_bell_states_are_normalized() {
        for psi in bell_states() {
            assert!((psi.vector().norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bell_states_are_mutually_orthogonal() {
        let basis = bell_states();
        for (i, a) in basis.iter().enumerate() {
            for (j, b) in basis.iter().enumerate() {
                let overlap = pure_fidelity(&a.projector(), b);
                if i == j {
                    assert!((overlap - 1.0).abs() < 1e-12);
                } else {
                    assert!(overlap < 1e-12, "states {} and {} overlap", i, j);
                }
            }
        }
    }
}
