// src/lib.rs

//! `qf` - an interpreter for QF, a brainfuck-style esoteric language whose
//! commands drive a register of qubits.
//!
//! A program is a flat string of single-character commands. `>`/`<` move a
//! pointer over the register, `+ ~ - x @` emit gates on the pointed qubit,
//! `:` takes a non-collapsing probability estimate and `[ ... ]` repeats its
//! body while an outcome sampled from that estimate reads 1. Every run
//! returns its full history and the emitted circuit.
//!
//! ```
//! use qf::{interpret, GateKind, InterpreterOptions, RunStatus};
//!
//! let report = interpret("+:", 1, InterpreterOptions::default()).unwrap();
//! assert_eq!(report.status, RunStatus::Halted);
//! assert_eq!(report.circuit.snapshot()[0].kind, GateKind::Hadamard);
//! assert_eq!(report.history.len(), 2);
//! ```

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod vm;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use crate::core::{ErrorKind, Outcome, QfError, RandomSource, Register, StateVector};
pub use crate::operations::{GateKind, GateRecord};
pub use crate::circuits::Circuit;
pub use crate::simulation::{Backend, ProbabilityEstimate, StateVectorBackend};
pub use crate::vm::{
    interpret, BracketMap, CancellationToken, Command, History, InitialState, Interpreter,
    InterpreterOptions, MachineState, Program, RunError, RunReport, RunStatus, Token,
};
pub use crate::validation::{check_normalization, validate_state};
