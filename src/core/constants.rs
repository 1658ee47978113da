//! Numeric constants shared by the backend and the interpreter.

/// Constants for gate construction and state checks.
pub mod qf_constants {
    /// Rotation angle of the Phase+ gate (T gate). Phase- uses the negation.
    pub const PHASE_ANGLE: f64 = std::f64::consts::FRAC_PI_4;
    /// Largest register the dense backend will allocate (2^24 amplitudes).
    pub const MAX_QUBITS: usize = 24;
    /// Allowed deviation of the squared norm from 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Squared norms below this are treated as zero.
    pub const AMPLITUDE_TOLERANCE: f64 = 1e-12;
}
