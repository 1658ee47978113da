// src/core/register.rs

use super::constants::qf_constants::MAX_QUBITS;
use super::error::QfError;
use std::fmt;

/// The qubit register seen by a running program: a fixed size and the pointer
/// selecting the qubit that gate commands act on.
///
/// The pointer always stays in `[0, size)`; every move wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register {
    size: usize,
    pointer: usize,
}

impl Register {
    /// Creates a register of `size` qubits with the pointer on qubit 0.
    pub fn new(size: usize) -> Result<Self, QfError> {
        if size == 0 || size > MAX_QUBITS {
            return Err(QfError::InvalidRegisterSize { size, max: MAX_QUBITS });
        }
        Ok(Self { size, pointer: 0 })
    }

    /// Number of qubits.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Currently selected qubit.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// `>`: moves the pointer one qubit up, wrapping to 0.
    pub fn advance(&mut self) {
        self.pointer = (self.pointer + 1) % self.size;
    }

    /// `<`: moves the pointer one qubit down, wrapping to `size - 1`.
    pub fn retreat(&mut self) {
        self.pointer = (self.pointer + self.size - 1) % self.size;
    }

    /// Places the pointer on `index`, reduced modulo the register size.
    pub fn jump(&mut self, index: usize) {
        self.pointer = index % self.size;
    }

    /// The qubit after the pointer (default target of a controlled gate).
    pub fn neighbour(&self) -> usize {
        (self.pointer + 1) % self.size
    }

    /// Returns `index` if it names a qubit of this register.
    pub fn check(&self, index: usize) -> Result<usize, QfError> {
        if index < self.size {
            Ok(index)
        } else {
            Err(QfError::QubitIndex { index, size: self.size })
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register({} qubits, pointer={})", self.size, self.pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_wraps_both_ways() -> Result<(), QfError> {
        let mut reg = Register::new(3)?;
        reg.retreat();
        assert_eq!(reg.pointer(), 2);
        reg.advance();
        assert_eq!(reg.pointer(), 0);
        reg.jump(7);
        assert_eq!(reg.pointer(), 1);
        assert_eq!(reg.neighbour(), 2);
        Ok(())
    }

    #[test]
    fn rejects_empty_and_oversized_registers() {
        assert!(matches!(Register::new(0), Err(QfError::InvalidRegisterSize { size: 0, .. })));
        assert!(Register::new(MAX_QUBITS + 1).is_err());
    }

    #[test]
    fn check_reports_out_of_range_index() -> Result<(), QfError> {
        let reg = Register::new(3)?;
        assert_eq!(reg.check(2)?, 2);
        assert_eq!(reg.check(5), Err(QfError::QubitIndex { index: 5, size: 3 }));
        Ok(())
    }
}
