// src/vm/history.rs

//! Per-step snapshots of a run.

use super::program::Command;
use crate::core::{Outcome, StateVector};
use crate::simulation::ProbabilityEstimate;
use std::fmt;

/// Machine state after one dispatched command. Immutable once recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState {
    /// Zero-based index of the step in the run.
    pub step: usize,
    /// The command executed.
    pub command: Command,
    /// Program counter of the executed token.
    pub program_counter: usize,
    /// Register pointer after the command.
    pub pointer: usize,
    /// Probability estimate taken (`:`) or used (`]`) at this step.
    pub estimate: Option<ProbabilityEstimate>,
    /// Outcome sampled by a `]`.
    pub outcome: Option<Outcome>,
    /// Amplitudes after the step, captured when the step queried the state
    /// (or on every step when state tracing is enabled).
    pub state: Option<StateVector>,
    /// Circuit length after the step.
    pub circuit_len: usize,
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<4} pc={:04} cmd={} ptr={} gates={}",
            self.step, self.program_counter, self.command, self.pointer, self.circuit_len
        )?;
        if let Some(est) = &self.estimate {
            write!(f, " [{}]", est)?;
        }
        if let Some(outcome) = self.outcome {
            write!(f, " -> {}", outcome)?;
        }
        Ok(())
    }
}

/// Append-only record of a run, one [`MachineState`] per dispatched command,
/// in execution order (loop iterations appear once per pass).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<MachineState>,
}

impl History {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one step.
    pub fn append(&mut self, state: MachineState) {
        self.entries.push(state);
    }

    /// All recorded steps in order.
    pub fn sequence(&self) -> &[MachineState] {
        &self.entries
    }

    /// The latest step.
    pub fn last(&self) -> Option<&MachineState> {
        self.entries.last()
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing was executed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every estimate taken during the run, in order.
    pub fn estimates(&self) -> impl Iterator<Item = &ProbabilityEstimate> {
        self.entries.iter().filter_map(|s| s.estimate.as_ref())
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "History ({} steps)", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry)?;
        }
        Ok(())
    }
}
