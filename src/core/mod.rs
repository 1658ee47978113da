// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod random;
pub mod register;
pub mod state;

pub use error::{ErrorKind, QfError};
pub use random::RandomSource;
pub use register::Register;
pub use state::{Outcome, StateVector};

pub mod constants;
pub use constants::qf_constants::{MAX_QUBITS, PHASE_ANGLE};
