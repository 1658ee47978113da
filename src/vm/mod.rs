// src/vm/mod.rs

//! The QF interpreter: command table, loop resolution, run configuration,
//! the control-flow engine and its history.

pub mod program;
mod loops;
mod history;
mod options;
mod interpreter;

pub use program::{Command, Program, Token};
pub use loops::BracketMap;
pub use history::{History, MachineState};
pub use options::{CancellationToken, InitialState, InterpreterOptions};
pub use interpreter::{interpret, Interpreter, RunError, RunReport, RunStatus};
