// src/simulation/engine.rs
use super::{Backend, ProbabilityEstimate};
use crate::core::constants::qf_constants::{AMPLITUDE_TOLERANCE, MAX_QUBITS, PHASE_ANGLE};
use crate::core::{Outcome, QfError, RandomSource, StateVector};
use crate::operations::{GateKind, GateRecord};
use crate::validation::{check_normalization, validate_state};
use num_complex::Complex;
use num_traits::Zero;
use tracing::trace;

type Matrix2 = [[Complex<f64>; 2]; 2];

/// Register state of the dense backend: the full 2^n amplitude vector.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRegister {
    num_qubits: usize,
    state: StateVector,
}

impl DenseRegister {
    /// Number of qubits held.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Current amplitudes.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    fn zero_state(num_qubits: usize) -> StateVector {
        let mut initial_vec = vec![Complex::zero(); 1usize << num_qubits];
        initial_vec[0] = Complex::new(1.0, 0.0);
        StateVector::new(initial_vec)
    }

    fn check_qubit(&self, qubit: usize) -> Result<(), QfError> {
        if qubit >= self.num_qubits {
            return Err(QfError::QubitIndex { index: qubit, size: self.num_qubits });
        }
        Ok(())
    }

    /// Applies a 2x2 matrix to `target`. Pairs of basis states differing only in
    /// the target bit are updated together.
    fn apply_single_qubit_gate(&mut self, target: usize, matrix: &Matrix2) {
        let mask = 1usize << target;
        let vec = self.state.vector_mut();
        for i0 in 0..vec.len() {
            if i0 & mask != 0 {
                continue;
            }
            let i1 = i0 | mask;
            let (psi_0, psi_1) = (vec[i0], vec[i1]);
            vec[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            vec[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Applies `matrix` to `target` on the subspace where `control` is 1.
    fn apply_controlled_gate(&mut self, control: usize, target: usize, matrix: &Matrix2) {
        let c_mask = 1usize << control;
        let t_mask = 1usize << target;
        let vec = self.state.vector_mut();
        for i0 in 0..vec.len() {
            if i0 & c_mask == 0 || i0 & t_mask != 0 {
                continue;
            }
            let i1 = i0 | t_mask;
            let (psi_0, psi_1) = (vec[i0], vec[i1]);
            vec[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            vec[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }
}

/// Dense state-vector simulator.
///
/// Holds no state of its own; everything lives in the [`DenseRegister`]
/// handles it allocates, so one backend value can serve many runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateVectorBackend;

impl StateVectorBackend {
    /// Creates the backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for StateVectorBackend {
    type Handle = DenseRegister;

    fn allocate(&mut self, num_qubits: usize) -> Result<DenseRegister, QfError> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(QfError::InvalidRegisterSize { size: num_qubits, max: MAX_QUBITS });
        }
        Ok(DenseRegister { num_qubits, state: DenseRegister::zero_state(num_qubits) })
    }

    fn load_state(&mut self, handle: &mut DenseRegister, amplitudes: &[Complex<f64>]) -> Result<(), QfError> {
        validate_state(amplitudes, handle.num_qubits)?;
        handle.state = StateVector::new(amplitudes.to_vec());
        Ok(())
    }

    fn apply_gate(&mut self, handle: &mut DenseRegister, gate: &GateRecord) -> Result<(), QfError> {
        handle.check_qubit(gate.target)?;
        trace!(gate = %gate, "applying gate");
        let matrix = gate_matrix(gate.kind);
        match (gate.kind, gate.control) {
            (GateKind::ControlledX, Some(control)) => {
                handle.check_qubit(control)?;
                if control == gate.target {
                    return Err(QfError::ControlIsTarget { qubit: control });
                }
                handle.apply_controlled_gate(control, gate.target, &matrix);
            }
            (GateKind::ControlledX, None) => {
                return Err(QfError::backend(format!("{} is missing its control qubit", gate)));
            }
            (_, Some(_)) => {
                return Err(QfError::backend(format!("{} does not take a control qubit", gate)));
            }
            (_, None) => handle.apply_single_qubit_gate(gate.target, &matrix),
        }
        Ok(())
    }

    fn probabilities(&self, handle: &DenseRegister, qubit: usize) -> Result<ProbabilityEstimate, QfError> {
        handle.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        let (mut p0, mut p1) = (0.0, 0.0);
        for (k, amp) in handle.state.vector().iter().enumerate() {
            if k & mask == 0 {
                p0 += amp.norm_sqr();
            } else {
                p1 += amp.norm_sqr();
            }
        }
        Ok(ProbabilityEstimate { qubit, p0, p1 })
    }

    fn reset_to_zero(&mut self, handle: &mut DenseRegister) -> Result<(), QfError> {
        handle.state = DenseRegister::zero_state(handle.num_qubits);
        Ok(())
    }

    /// Haar-random state: independent complex Gaussian amplitudes, normalized.
    fn randomize_state(&mut self, handle: &mut DenseRegister, rng: &mut RandomSource) -> Result<(), QfError> {
        let dim = 1usize << handle.num_qubits;
        let mut amplitudes: Vec<Complex<f64>> =
            (0..dim).map(|_| Complex::new(rng.gaussian(), rng.gaussian())).collect();
        let norm = amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        if norm < AMPLITUDE_TOLERANCE || !norm.is_finite() {
            return Err(QfError::backend("random state draw produced a zero vector"));
        }
        for amp in &mut amplitudes {
            *amp /= norm;
        }
        check_normalization(&amplitudes, None)?;
        handle.state = StateVector::new(amplitudes);
        Ok(())
    }

    fn collapse(&mut self, handle: &mut DenseRegister, qubit: usize, outcome: Outcome) -> Result<(), QfError> {
        let estimate = self.probabilities(handle, qubit)?;
        let weight = match outcome {
            Outcome::Zero => estimate.p0,
            Outcome::One => estimate.p1,
        };
        if weight < AMPLITUDE_TOLERANCE {
            return Err(QfError::backend(format!(
                "cannot collapse qubit {} onto {}: probability {:e}",
                qubit, outcome, weight
            )));
        }
        let mask = 1usize << qubit;
        let keep_set = outcome == Outcome::One;
        let scale = weight.sqrt();
        for (k, amp) in handle.state.vector_mut().iter_mut().enumerate() {
            if (k & mask != 0) == keep_set {
                *amp /= scale;
            } else {
                *amp = Complex::zero();
            }
        }
        Ok(())
    }

    fn amplitude_snapshot(&self, handle: &DenseRegister) -> Result<StateVector, QfError> {
        Ok(handle.state.clone())
    }
}

/// The 2x2 unitary of a gate kind; for controlled gates, the matrix applied to
/// the target when the control is set.
fn gate_matrix(kind: GateKind) -> Matrix2 {
    use std::f64::consts::FRAC_1_SQRT_2;
    let one = Complex::new(1.0, 0.0);
    match kind {
        GateKind::Hadamard => [
            [Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(FRAC_1_SQRT_2, 0.0)],
            [Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(-FRAC_1_SQRT_2, 0.0)],
        ],
        GateKind::PhasePlus => phase_shift_matrix(PHASE_ANGLE),
        GateKind::PhaseMinus => phase_shift_matrix(-PHASE_ANGLE),
        GateKind::PauliX | GateKind::ControlledX => [[Complex::zero(), one], [one, Complex::zero()]],
    }
}

/// diag(1, e^(i*theta))
fn phase_shift_matrix(theta: f64) -> Matrix2 {
    [
        [Complex::new(1.0, 0.0), Complex::zero()],
        [Complex::zero(), Complex::new(theta.cos(), theta.sin())],
    ]
}
