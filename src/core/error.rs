//! Error handling logic

use thiserror::Error;

/// Coarse classification of a [`QfError`], used when reporting a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown token or malformed inline operand.
    Parse,
    /// A loop bracket without a partner.
    UnbalancedLoop,
    /// A gate or pointer referenced a qubit outside the register.
    QubitIndex,
    /// The simulation backend reported a failure.
    Backend,
    /// Invalid interpreter options (register size, initial state).
    Configuration,
}

/// Errors raised while parsing or running a QF program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QfError {
    /// A character that is not part of the command table.
    #[error("unknown command '{symbol}' at offset {offset}")]
    UnknownCommand {
        /// The offending character.
        symbol: char,
        /// Character offset in the program text.
        offset: usize,
    },

    /// An inline numeric operand that could not be read.
    #[error("malformed numeric operand at offset {offset}: {message}")]
    MalformedOperand {
        /// Character offset of the first digit.
        offset: usize,
        /// What went wrong.
        message: String,
    },

    /// A command value that has no source form, such as a bare controlled gate
    /// with no control operand.
    #[error("command '{command}' at offset {offset} cannot appear in a program")]
    InvalidCommand {
        /// Debug rendering of the command.
        command: String,
        /// Offset of the token.
        offset: usize,
    },

    /// A `[` with no matching `]` or the other way around.
    #[error("unbalanced loop: unmatched '{bracket}' at offset {offset}")]
    UnbalancedLoop {
        /// Either `[` or `]`.
        bracket: char,
        /// Character offset in the program text.
        offset: usize,
    },

    /// A qubit index outside `[0, size)`.
    #[error("qubit index {index} out of range for a register of {size} qubits")]
    QubitIndex {
        /// The requested index.
        index: usize,
        /// Register size.
        size: usize,
    },

    /// A controlled gate whose control and target coincide.
    #[error("controlled gate on qubit {qubit} targets its own control")]
    ControlIsTarget {
        /// The qubit used as both control and target.
        qubit: usize,
    },

    /// Register size of zero or above what the backend can hold.
    #[error("invalid register size {size} (supported: 1..={max})")]
    InvalidRegisterSize {
        /// Requested size.
        size: usize,
        /// Largest supported size.
        max: usize,
    },

    /// A state vector that cannot be loaded or has lost its normalization.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Failure message.
        message: String,
    },

    /// Failure reported by the simulation backend.
    #[error("backend failure: {message}")]
    Backend {
        /// Failure message.
        message: String,
    },
}

impl QfError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QfError::UnknownCommand { .. }
            | QfError::MalformedOperand { .. }
            | QfError::InvalidCommand { .. } => ErrorKind::Parse,
            QfError::UnbalancedLoop { .. } => ErrorKind::UnbalancedLoop,
            QfError::QubitIndex { .. } | QfError::ControlIsTarget { .. } => ErrorKind::QubitIndex,
            QfError::Backend { .. } => ErrorKind::Backend,
            QfError::InvalidRegisterSize { .. } | QfError::InvalidState { .. } => {
                ErrorKind::Configuration
            }
        }
    }

    pub(crate) fn backend(message: impl Into<String>) -> Self {
        QfError::Backend { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let parse = QfError::UnknownCommand { symbol: 'q', offset: 3 };
        assert_eq!(parse.kind(), ErrorKind::Parse);
        let own_target = QfError::ControlIsTarget { qubit: 0 };
        assert_eq!(own_target.kind(), ErrorKind::QubitIndex);
        assert_eq!(QfError::backend("gone").kind(), ErrorKind::Backend);
        let bare_cx = QfError::InvalidCommand { command: "Gate(ControlledX)".into(), offset: 0 };
        assert_eq!(bare_cx.kind(), ErrorKind::Parse);
    }

    #[test]
    fn messages_name_the_position() {
        let err = QfError::UnbalancedLoop { bracket: ']', offset: 7 };
        assert_eq!(err.to_string(), "unbalanced loop: unmatched ']' at offset 7");
    }
}
