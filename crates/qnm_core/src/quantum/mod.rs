//! Two-qubit quantum state handling and fidelity scoring.
//!
//! Delivered states arrive as raw 4x4 complex matrices from the event
//! source. [`DensityMatrix`] validates them (Hermitian, unit trace) and the
//! [`FidelityEvaluator`] scores them against a reference target set — by
//! default the four maximally-entangled Bell states.

pub mod bell;
pub mod fidelity;
pub mod state;

pub use bell::{bell_states, PHI_MINUS, PHI_PLUS, PSI_MINUS, PSI_PLUS};
pub use fidelity::{pure_fidelity, uhlmann_fidelity, FidelityEvaluator, ReferenceState};
pub use state::{DensityMatrix, RawState, StateVector};
