// src/vm/loops.rs

//! Loop resolution: pairs every `[` with its `]` before execution starts.

use super::program::{Command, Token};
use crate::core::QfError;

/// Precomputed jump table between matching loop brackets.
///
/// Indexed by program counter; `partner[pc]` is the matching bracket for a
/// `[` or `]` at `pc` and `None` for every other token. Lookups are O(1).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BracketMap {
    partner: Vec<Option<usize>>,
    pairs: Vec<(usize, usize)>,
}

impl BracketMap {
    /// Scans `tokens` once, left to right, with a stack of open positions.
    ///
    /// # Errors
    /// `QfError::UnbalancedLoop` naming the source offset of the first `]`
    /// without an open partner or, after the scan, of the innermost `[`
    /// left open.
    pub fn resolve(tokens: &[Token]) -> Result<BracketMap, QfError> {
        let mut partner = vec![None; tokens.len()];
        let mut pairs = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        for (pc, token) in tokens.iter().enumerate() {
            match token.command {
                Command::LoopOpen => open.push(pc),
                Command::LoopClose => {
                    let start = open.pop().ok_or(QfError::UnbalancedLoop { bracket: ']', offset: token.offset })?;
                    partner[start] = Some(pc);
                    partner[pc] = Some(start);
                    pairs.push((start, pc));
                }
                _ => {}
            }
        }

        if let Some(&start) = open.last() {
            return Err(QfError::UnbalancedLoop { bracket: '[', offset: tokens[start].offset });
        }
        pairs.sort_unstable();
        Ok(BracketMap { partner, pairs })
    }

    /// The matching bracket for the bracket at `pc`.
    pub fn matching(&self, pc: usize) -> Option<usize> {
        self.partner.get(pc).copied().flatten()
    }

    /// All `(open, close)` pairs, ordered by open position.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::Program;

    fn resolve(text: &str) -> Result<BracketMap, QfError> {
        Program::parse(text, false).map(|p| p.brackets().clone())
    }

    #[test]
    fn nested_loops_pair_inside_out() -> Result<(), QfError> {
        let map = resolve("[+[:]>]")?;
        assert_eq!(map.pairs(), &[(0, 6), (2, 4)]);
        assert_eq!(map.matching(6), Some(0));
        assert_eq!(map.matching(4), Some(2));
        assert_eq!(map.matching(1), None);
        assert_eq!(map.matching(100), None);
        Ok(())
    }

    #[test]
    fn stray_close_names_its_offset() {
        assert_eq!(resolve("+]"), Err(QfError::UnbalancedLoop { bracket: ']', offset: 1 }));
    }

    #[test]
    fn unclosed_open_names_innermost() {
        assert_eq!(resolve("[[]["), Err(QfError::UnbalancedLoop { bracket: '[', offset: 3 }));
    }

    #[test]
    fn offsets_are_source_positions() {
        // operand digits shift the offsets of later tokens
        assert_eq!(resolve("@10]"), Err(QfError::UnbalancedLoop { bracket: ']', offset: 3 }));
    }
}
