// src/validation/mod.rs

//! Checks applied to amplitude vectors before they are loaded into, or after
//! they are produced by, the backend.

use crate::core::constants::qf_constants::NORM_TOLERANCE;
use crate::core::QfError;
use num_complex::Complex;

/// Checks that the squared norm of `amplitudes` is 1 within `tolerance`
/// (defaults to `1e-9` when `None`).
///
/// # Errors
/// Returns `QfError::InvalidState` if the norm deviates or is not finite.
pub fn check_normalization(amplitudes: &[Complex<f64>], tolerance: Option<f64>) -> Result<(), QfError> {
    let tol = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq: f64 = amplitudes.iter().map(|c| c.norm_sqr()).sum();
    if !norm_sq.is_finite() || (norm_sq - 1.0).abs() > tol {
        return Err(QfError::InvalidState {
            message: format!("squared norm {} deviates from 1 by more than {}", norm_sq, tol),
        });
    }
    Ok(())
}

/// Checks that `amplitudes` has exactly `2^num_qubits` entries.
pub fn check_dimension(amplitudes: &[Complex<f64>], num_qubits: usize) -> Result<(), QfError> {
    let expected = 1usize << num_qubits;
    if amplitudes.len() != expected {
        return Err(QfError::InvalidState {
            message: format!(
                "expected {} amplitudes for {} qubits, got {}",
                expected,
                num_qubits,
                amplitudes.len()
            ),
        });
    }
    Ok(())
}

/// Runs [`check_dimension`] then [`check_normalization`] with the default tolerance.
pub fn validate_state(amplitudes: &[Complex<f64>], num_qubits: usize) -> Result<(), QfError> {
    check_dimension(amplitudes, num_qubits)?;
    check_normalization(amplitudes, None)
}
