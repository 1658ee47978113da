// src/operations/mod.rs

//! Gate records emitted by the interpreter.
//!
//! A [`GateRecord`] is the unit of the circuit log: the kind of gate, the qubit
//! it acts on and, for controlled gates, the control qubit.

use std::fmt;

/// The gates a QF program can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Hadamard (`+`, `H`).
    Hadamard,
    /// Phase rotation by +π/4, the T gate (`~`, `T`).
    PhasePlus,
    /// Phase rotation by -π/4, T-dagger (`-`, `D`).
    PhaseMinus,
    /// Bit flip (`x`, `X`).
    PauliX,
    /// Controlled bit flip (`@`, `C`).
    ControlledX,
}

impl GateKind {
    /// Short label used in circuit listings.
    pub fn label(self) -> &'static str {
        match self {
            GateKind::Hadamard => "H",
            GateKind::PhasePlus => "T",
            GateKind::PhaseMinus => "T†",
            GateKind::PauliX => "X",
            GateKind::ControlledX => "CX",
        }
    }

    /// Whether the gate needs a control qubit.
    pub fn is_controlled(self) -> bool {
        matches!(self, GateKind::ControlledX)
    }
}

/// One logged gate application.
///
/// For [`GateKind::ControlledX`] `target` is the flipped qubit and `control`
/// is always `Some`; single-qubit gates carry `control: None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GateRecord {
    /// Gate kind.
    pub kind: GateKind,
    /// The qubit the gate acts on.
    pub target: usize,
    /// Control qubit of a controlled gate.
    pub control: Option<usize>,
}

impl GateRecord {
    /// A single-qubit gate on `target`.
    pub fn single(kind: GateKind, target: usize) -> Self {
        Self { kind, target, control: None }
    }

    /// A controlled-X with the given control and target.
    pub fn controlled_x(control: usize, target: usize) -> Self {
        Self { kind: GateKind::ControlledX, target, control: Some(control) }
    }

    /// All qubit indices referenced by the record.
    pub fn qubits(&self) -> Vec<usize> {
        match self.control {
            Some(control) => vec![control, self.target],
            None => vec![self.target],
        }
    }
}

impl fmt::Display for GateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.control {
            Some(control) => write!(f, "{}({} -> {})", self.kind.label(), control, self.target),
            None => write!(f, "{}({})", self.kind.label(), self.target),
        }
    }
}
