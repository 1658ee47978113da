// src/vm/program.rs

//! The QF command table and program representation.

use super::loops::BracketMap;
use crate::core::QfError;
use crate::operations::GateKind;
use std::fmt;

// --- Command Table ---

/// A single QF command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `>`: move the pointer up one qubit (wrapping).
    PointerRight,
    /// `<`: move the pointer down one qubit (wrapping).
    PointerLeft,
    /// `+`/`H`, `~`/`T`, `-`/`D`, `x`/`X`: a single-qubit gate on the pointer qubit.
    Gate(GateKind),
    /// `@`/`C`: controlled-X with the pointer as control.
    ///
    /// `target` is the inline numeric operand; without one the target is the
    /// qubit after the pointer.
    ControlledX {
        /// Explicit target qubit.
        target: Option<usize>,
    },
    /// `:`: non-collapsing probability estimate of the pointer qubit.
    Estimate,
    /// `,`: reset the register to the all-zero state.
    Reset,
    /// `;`: replace the register state with a random state.
    Randomize,
    /// `[`: loop start. No effect on its own.
    LoopOpen,
    /// `]`: loop end; repeats the body when a sampled outcome is 1.
    LoopClose,
    /// `?`: Hadamard or Phase+ on the pointer qubit, chosen uniformly.
    RandomGate,
    /// `!`: move the pointer to a uniformly random qubit.
    RandomPointer,
    /// `*`: move the program counter to a uniformly random token.
    RandomJump,
}

impl Command {
    /// Looks up the command for a source character. Returns `None` for
    /// characters outside the table. `@`/`C` come back without an operand;
    /// the parser fills it in.
    pub fn from_symbol(symbol: char) -> Option<Command> {
        let command = match symbol {
            '>' => Command::PointerRight,
            '<' => Command::PointerLeft,
            '+' | 'H' => Command::Gate(GateKind::Hadamard),
            '~' | 'T' => Command::Gate(GateKind::PhasePlus),
            '-' | 'D' => Command::Gate(GateKind::PhaseMinus),
            'x' | 'X' => Command::Gate(GateKind::PauliX),
            '@' | 'C' => Command::ControlledX { target: None },
            ':' => Command::Estimate,
            ',' => Command::Reset,
            ';' => Command::Randomize,
            '[' => Command::LoopOpen,
            ']' => Command::LoopClose,
            '?' => Command::RandomGate,
            '!' => Command::RandomPointer,
            '*' => Command::RandomJump,
            _ => return None,
        };
        Some(command)
    }

    /// Whether the command may be followed by an inline numeric operand.
    pub fn accepts_operand(&self) -> bool {
        matches!(self, Command::ControlledX { .. })
    }

    /// Canonical source symbol.
    pub fn symbol(&self) -> char {
        match self {
            Command::PointerRight => '>',
            Command::PointerLeft => '<',
            Command::Gate(GateKind::Hadamard) => '+',
            Command::Gate(GateKind::PhasePlus) => '~',
            Command::Gate(GateKind::PhaseMinus) => '-',
            Command::Gate(GateKind::PauliX) => 'x',
            Command::Gate(GateKind::ControlledX) | Command::ControlledX { .. } => '@',
            Command::Estimate => ':',
            Command::Reset => ',',
            Command::Randomize => ';',
            Command::LoopOpen => '[',
            Command::LoopClose => ']',
            Command::RandomGate => '?',
            Command::RandomPointer => '!',
            Command::RandomJump => '*',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ControlledX { target: Some(t) } => write!(f, "@{}", t),
            other => write!(f, "{}", other.symbol()),
        }
    }
}

/// A parsed command together with where it came from in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The command.
    pub command: Command,
    /// Character offset of the command symbol in the source text.
    pub offset: usize,
}

// --- Program Structure ---

/// An immutable, validated QF program: the token sequence and its bracket map.
///
/// # Examples
/// ```
/// use qf::vm::{Command, Program};
///
/// let program = Program::parse("[+@2:]", false).unwrap();
/// assert_eq!(program.len(), 5);
/// assert_eq!(program.token(1).unwrap().command, Command::ControlledX { target: Some(2) });
/// assert_eq!(program.brackets().matching(0), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    tokens: Vec<Token>,
    brackets: BracketMap,
}

impl Program {
    /// Tokenizes `text` and resolves its loops.
    ///
    /// With `skip_unknown` set, characters outside the command table
    /// (including whitespace) are dropped; otherwise the first one fails the
    /// parse with [`QfError::UnknownCommand`].
    ///
    /// # Errors
    /// * `UnknownCommand` for an unrecognized character.
    /// * `MalformedOperand` for an inline operand that does not fit in `usize`.
    /// * `UnbalancedLoop` for an unmatched bracket.
    pub fn parse(text: &str, skip_unknown: bool) -> Result<Program, QfError> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::with_capacity(chars.len());
        let mut i = 0;
        while i < chars.len() {
            let symbol = chars[i];
            let Some(mut command) = Command::from_symbol(symbol) else {
                if skip_unknown {
                    i += 1;
                    continue;
                }
                return Err(QfError::UnknownCommand { symbol, offset: i });
            };
            let offset = i;
            i += 1;
            if command.accepts_operand() {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i > start {
                    let digits: String = chars[start..i].iter().collect();
                    let target = digits.parse::<usize>().map_err(|e| QfError::MalformedOperand {
                        offset: start,
                        message: format!("'{}': {}", digits, e),
                    })?;
                    command = Command::ControlledX { target: Some(target) };
                }
            }
            tokens.push(Token { command, offset });
        }
        Self::from_tokens(tokens)
    }

    /// Builds a program from already-parsed tokens, resolving its loops.
    ///
    /// `Gate` commands must name a single-qubit kind; controlled-X is only
    /// expressible as [`Command::ControlledX`], which carries the target.
    pub fn from_tokens(tokens: Vec<Token>) -> Result<Program, QfError> {
        if let Some(token) = tokens
            .iter()
            .find(|t| matches!(t.command, Command::Gate(kind) if kind.is_controlled()))
        {
            return Err(QfError::InvalidCommand { command: format!("{:?}", token.command), offset: token.offset });
        }
        let brackets = BracketMap::resolve(&tokens)?;
        Ok(Program { tokens, brackets })
    }

    /// Builds a program from bare commands; offsets are the command positions.
    pub fn from_commands<I>(commands: I) -> Result<Program, QfError>
    where
        I: IntoIterator<Item = Command>,
    {
        let tokens = commands
            .into_iter()
            .enumerate()
            .map(|(offset, command)| Token { command, offset })
            .collect();
        Self::from_tokens(tokens)
    }

    /// Token at a program counter position.
    pub fn token(&self, pc: usize) -> Option<&Token> {
        self.tokens.get(pc)
    }

    /// All tokens in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The resolved loop pairs.
    pub fn brackets(&self) -> &BracketMap {
        &self.brackets
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` for an empty program.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QF Program ({} tokens)", self.tokens.len())?;
        for (pc, token) in self.tokens.iter().enumerate() {
            match self.brackets.matching(pc) {
                Some(partner) => writeln!(f, "  {:04}: {}  (pairs with {:04})", pc, token.command, partner)?,
                None => writeln!(f, "  {:04}: {}", pc, token.command)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_same_command() {
        for (a, b) in [('+', 'H'), ('~', 'T'), ('-', 'D'), ('x', 'X'), ('@', 'C')] {
            assert_eq!(Command::from_symbol(a), Command::from_symbol(b));
        }
        assert_eq!(Command::from_symbol('q'), None);
    }

    #[test]
    fn controlled_operand_is_multi_digit() -> Result<(), QfError> {
        let program = Program::parse("C12>@", false)?;
        assert_eq!(program.len(), 3);
        assert_eq!(program.tokens()[0].command, Command::ControlledX { target: Some(12) });
        assert_eq!(program.tokens()[1].offset, 3);
        assert_eq!(program.tokens()[2].command, Command::ControlledX { target: None });
        Ok(())
    }

    #[test]
    fn whitespace_is_an_error_unless_skipped() -> Result<(), QfError> {
        assert_eq!(
            Program::parse("+ :", false),
            Err(QfError::UnknownCommand { symbol: ' ', offset: 1 })
        );
        let program = Program::parse("+ :\n", true)?;
        assert_eq!(program.len(), 2);
        assert_eq!(program.tokens()[1].offset, 2);
        Ok(())
    }

    #[test]
    fn bare_digit_is_unknown() {
        assert!(matches!(Program::parse("+5", false), Err(QfError::UnknownCommand { symbol: '5', offset: 1 })));
    }

    #[test]
    fn oversized_operand_is_malformed() {
        let text = format!("@{}", "9".repeat(40));
        assert!(matches!(Program::parse(&text, false), Err(QfError::MalformedOperand { offset: 1, .. })));
    }

    #[test]
    fn from_commands_resolves_loops() -> Result<(), QfError> {
        let program = Program::from_commands([Command::LoopOpen, Command::Estimate, Command::LoopClose])?;
        assert_eq!(program.brackets().pairs(), &[(0, 2)]);
        assert!(Program::from_commands([Command::LoopClose]).is_err());
        Ok(())
    }

    #[test]
    fn controlled_gate_kind_is_not_a_command() {
        let result = Program::from_commands([Command::Estimate, Command::Gate(GateKind::ControlledX)]);
        assert!(matches!(result, Err(QfError::InvalidCommand { offset: 1, .. })));
        assert_eq!(Command::Gate(GateKind::ControlledX).symbol(), '@');
        assert_eq!(Command::Gate(GateKind::PauliX).symbol(), 'x');
    }

    #[test]
    fn listing_marks_loop_partners() -> Result<(), QfError> {
        let text = Program::parse("[+]", false)?.to_string();
        assert!(text.contains("0000: [  (pairs with 0002)"));
        assert!(text.contains("0001: +"));
        Ok(())
    }
}
