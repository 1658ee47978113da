// src/circuits/mod.rs

//! The circuit accumulator: an append-only log of the gates a run emitted.

use crate::core::QfError;
use crate::operations::GateRecord;
use std::fmt;

/// Ordered, append-only sequence of [`GateRecord`]s over a register of fixed size.
///
/// Every record is checked against the register size on the way in, so all
/// stored qubit indices lie in `[0, num_qubits)`.
///
/// # Examples
/// ```
/// use qf::{Circuit, GateKind, GateRecord};
///
/// let mut circuit = Circuit::new(2);
/// circuit.append(GateRecord::single(GateKind::Hadamard, 0)).unwrap();
/// circuit.append(GateRecord::controlled_x(0, 1)).unwrap();
/// assert_eq!(circuit.len(), 2);
/// assert!(circuit.append(GateRecord::single(GateKind::PauliX, 2)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    num_qubits: usize,
    gates: Vec<GateRecord>,
}

impl Circuit {
    /// Creates an empty circuit for `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self { num_qubits, gates: Vec::new() }
    }

    /// Appends a gate, failing with [`QfError::QubitIndex`] if it references a
    /// qubit outside the register. A rejected record leaves the circuit untouched.
    pub fn append(&mut self, gate: GateRecord) -> Result<(), QfError> {
        for index in gate.qubits() {
            if index >= self.num_qubits {
                return Err(QfError::QubitIndex { index, size: self.num_qubits });
            }
        }
        if gate.control == Some(gate.target) {
            return Err(QfError::ControlIsTarget { qubit: gate.target });
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Read-only view of the gates in emission order.
    pub fn snapshot(&self) -> &[GateRecord] {
        &self.gates
    }

    /// Register size the circuit was created for.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if no gate has been emitted.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Iterates over the gates in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &GateRecord> {
        self.gates.iter()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qf::Circuit[{} gates on {} qubits]", self.gates.len(), self.num_qubits)?;
        for (t, gate) in self.gates.iter().enumerate() {
            writeln!(f, "  {:04}: {}", t, gate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::GateKind;

    #[test]
    fn rejected_gate_leaves_circuit_unchanged() {
        let mut circuit = Circuit::new(2);
        assert!(circuit.append(GateRecord::single(GateKind::Hadamard, 1)).is_ok());
        let err = circuit.append(GateRecord::controlled_x(1, 4));
        assert_eq!(err, Err(QfError::QubitIndex { index: 4, size: 2 }));
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn control_must_differ_from_target() {
        let mut circuit = Circuit::new(1);
        assert_eq!(
            circuit.append(GateRecord::controlled_x(0, 0)),
            Err(QfError::ControlIsTarget { qubit: 0 })
        );
        assert!(circuit.is_empty());
    }

    #[test]
    fn listing_shows_each_gate() {
        let mut circuit = Circuit::new(2);
        circuit.append(GateRecord::single(GateKind::PhaseMinus, 0)).ok();
        circuit.append(GateRecord::controlled_x(0, 1)).ok();
        let text = circuit.to_string();
        assert!(text.contains("0000: T†(0)"));
        assert!(text.contains("0001: CX(0 -> 1)"));
    }
}
