// src/simulation/mod.rs

//! The simulation backend seen by the interpreter.
//!
//! The interpreter only talks to a [`Backend`]: it allocates a register, applies
//! gate records to it and asks for non-collapsing probability estimates and
//! amplitude snapshots. [`StateVectorBackend`] is the dense state-vector
//! implementation shipped with the crate.

mod results;
pub(crate) mod engine;

pub use engine::{DenseRegister, StateVectorBackend};
pub use results::ProbabilityEstimate;

use crate::core::{Outcome, QfError, RandomSource, StateVector};
use crate::operations::GateRecord;
use num_complex::Complex;

/// Operations the interpreter needs from a quantum simulator.
///
/// A backend hands out one `Handle` per run; the handle owns the register
/// state and is only ever touched by the run that allocated it. All calls are
/// synchronous. Any `Err` is treated by the interpreter as a fatal backend
/// failure for the current step.
pub trait Backend {
    /// Register state owned by a single run.
    type Handle;

    /// Allocates `num_qubits` qubits in the all-zero state.
    fn allocate(&mut self, num_qubits: usize) -> Result<Self::Handle, QfError>;

    /// Replaces the register state with `amplitudes`.
    fn load_state(&mut self, handle: &mut Self::Handle, amplitudes: &[Complex<f64>]) -> Result<(), QfError>;

    /// Applies one gate.
    fn apply_gate(&mut self, handle: &mut Self::Handle, gate: &GateRecord) -> Result<(), QfError>;

    /// Probability of reading 0 and 1 on `qubit`. Must not change the state.
    fn probabilities(&self, handle: &Self::Handle, qubit: usize) -> Result<ProbabilityEstimate, QfError>;

    /// Returns the register to the all-zero state.
    fn reset_to_zero(&mut self, handle: &mut Self::Handle) -> Result<(), QfError>;

    /// Replaces the register state with a random normalized state drawn from `rng`.
    fn randomize_state(&mut self, handle: &mut Self::Handle, rng: &mut RandomSource) -> Result<(), QfError>;

    /// Projects `qubit` onto `outcome` and renormalizes.
    fn collapse(&mut self, handle: &mut Self::Handle, qubit: usize, outcome: Outcome) -> Result<(), QfError>;

    /// Copy of the current amplitude vector.
    fn amplitude_snapshot(&self, handle: &Self::Handle) -> Result<StateVector, QfError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::GateKind;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn assert_amplitudes(state: &StateVector, expected: &[Complex<f64>]) {
        assert_eq!(state.dim(), expected.len(), "dimension mismatch");
        for (i, (got, want)) in state.vector().iter().zip(expected).enumerate() {
            assert!(
                (got - want).norm() < TEST_TOLERANCE,
                "amplitude {} differs: got {}, expected {}",
                i,
                got,
                want
            );
        }
    }

    #[test]
    fn hadamard_then_estimate_is_even() -> Result<(), QfError> {
        let mut backend = StateVectorBackend::new();
        let mut reg = backend.allocate(1)?;
        backend.apply_gate(&mut reg, &GateRecord::single(GateKind::Hadamard, 0))?;
        let est = backend.probabilities(&reg, 0)?;
        assert!((est.p0 - 0.5).abs() < TEST_TOLERANCE);
        assert!((est.p1 - 0.5).abs() < TEST_TOLERANCE);
        let again = backend.probabilities(&reg, 0)?;
        assert_eq!(est, again);
        Ok(())
    }

    #[test]
    fn bell_pair_from_hadamard_and_cnot() -> Result<(), QfError> {
        let mut backend = StateVectorBackend::new();
        let mut reg = backend.allocate(2)?;
        assert_eq!(reg.num_qubits(), 2);
        assert_eq!(reg.state().dim(), 4);
        backend.apply_gate(&mut reg, &GateRecord::single(GateKind::Hadamard, 0))?;
        backend.apply_gate(&mut reg, &GateRecord::controlled_x(0, 1))?;
        let s = FRAC_1_SQRT_2;
        let zero = Complex::new(0.0, 0.0);
        assert_amplitudes(
            &backend.amplitude_snapshot(&reg)?,
            &[Complex::new(s, 0.0), zero, zero, Complex::new(s, 0.0)],
        );
        Ok(())
    }

    #[test]
    fn phase_gates_cancel() -> Result<(), QfError> {
        let mut backend = StateVectorBackend::new();
        let mut reg = backend.allocate(1)?;
        backend.apply_gate(&mut reg, &GateRecord::single(GateKind::Hadamard, 0))?;
        backend.apply_gate(&mut reg, &GateRecord::single(GateKind::PhasePlus, 0))?;
        let after_t = backend.amplitude_snapshot(&reg)?;
        let s = FRAC_1_SQRT_2;
        assert_amplitudes(&after_t, &[Complex::new(s, 0.0), Complex::new(0.5, 0.5)]);
        backend.apply_gate(&mut reg, &GateRecord::single(GateKind::PhaseMinus, 0))?;
        assert_amplitudes(
            &backend.amplitude_snapshot(&reg)?,
            &[Complex::new(s, 0.0), Complex::new(s, 0.0)],
        );
        Ok(())
    }

    #[test]
    fn randomized_state_is_normalized_and_seeded() -> Result<(), QfError> {
        let mut backend = StateVectorBackend::new();
        let mut a = backend.allocate(3)?;
        let mut b = backend.allocate(3)?;
        backend.randomize_state(&mut a, &mut RandomSource::seeded(11))?;
        backend.randomize_state(&mut b, &mut RandomSource::seeded(11))?;
        let sa = backend.amplitude_snapshot(&a)?;
        assert!((sa.norm_sqr() - 1.0).abs() < TEST_TOLERANCE);
        assert_eq!(sa, backend.amplitude_snapshot(&b)?);
        backend.reset_to_zero(&mut a)?;
        assert!((backend.probabilities(&a, 2)?.p0 - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn collapse_projects_and_renormalizes() -> Result<(), QfError> {
        let mut backend = StateVectorBackend::new();
        let mut reg = backend.allocate(2)?;
        backend.apply_gate(&mut reg, &GateRecord::single(GateKind::Hadamard, 0))?;
        backend.apply_gate(&mut reg, &GateRecord::controlled_x(0, 1))?;
        backend.collapse(&mut reg, 0, Outcome::One)?;
        let zero = Complex::new(0.0, 0.0);
        assert_amplitudes(
            &backend.amplitude_snapshot(&reg)?,
            &[zero, zero, zero, Complex::new(1.0, 0.0)],
        );
        // |11> has no weight on qubit 1 = 0
        assert!(matches!(backend.collapse(&mut reg, 1, Outcome::Zero), Err(QfError::Backend { .. })));
        Ok(())
    }

    #[test]
    fn load_state_validates_input() -> Result<(), QfError> {
        let mut backend = StateVectorBackend::new();
        let mut reg = backend.allocate(1)?;
        let bad = [Complex::new(1.0, 0.0), Complex::new(1.0, 0.0)];
        assert!(matches!(backend.load_state(&mut reg, &bad), Err(QfError::InvalidState { .. })));
        let one = [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)];
        backend.load_state(&mut reg, &one)?;
        assert!((backend.probabilities(&reg, 0)?.p1 - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }
}
