// src/vm/interpreter.rs

//! The QF interpreter: the control-flow engine that walks a [`Program`],
//! drives the backend and records the run.

use super::history::{History, MachineState};
use super::options::{InitialState, InterpreterOptions};
use super::program::{Command, Program, Token};
use crate::circuits::Circuit;
use crate::core::{ErrorKind, Outcome, QfError, RandomSource, Register, StateVector};
use crate::operations::{GateKind, GateRecord};
use crate::simulation::{Backend, ProbabilityEstimate, StateVectorBackend};
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A fatal runtime failure together with where it happened.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("step {step} (pc {program_counter}): {error}")]
pub struct RunError {
    /// Index of the step that failed (equals the number of completed steps).
    pub step: usize,
    /// Program counter of the failing token.
    pub program_counter: usize,
    /// The underlying error.
    #[source]
    pub error: QfError,
}

impl RunError {
    /// Taxonomy bucket of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// The program counter moved past the last token.
    Halted,
    /// The configured step ceiling was reached. Not an error.
    StepLimitExceeded {
        /// The configured ceiling.
        limit: usize,
    },
    /// A cancellation token fired between steps.
    Cancelled,
    /// A fatal error stopped the run; history and circuit hold everything
    /// completed before it.
    Errored(RunError),
}

impl RunStatus {
    /// Returns `true` for a run that reached the end of its program.
    pub fn is_halted(&self) -> bool {
        matches!(self, RunStatus::Halted)
    }

    /// The runtime error, if the run failed.
    pub fn error(&self) -> Option<&RunError> {
        match self {
            RunStatus::Errored(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Halted => write!(f, "halted"),
            RunStatus::StepLimitExceeded { limit } => write!(f, "step limit {} reached", limit),
            RunStatus::Cancelled => write!(f, "cancelled"),
            RunStatus::Errored(err) => write!(f, "errored at {}", err),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Terminal status.
    pub status: RunStatus,
    /// One entry per executed command.
    pub history: History,
    /// Every gate emitted, in order.
    pub circuit: Circuit,
    /// Register pointer at the end of the run.
    pub final_pointer: usize,
    /// Amplitudes at the end of the run, when the backend could provide them.
    pub final_state: Option<StateVector>,
    /// Seed of the run's random source, if one was configured.
    pub seed: Option<u64>,
}

/// The QF interpreter.
///
/// Owns a [`Backend`] and the options for its runs. Each call to
/// [`run`](Self::run) allocates a fresh register handle and random source, so
/// runs never share state.
///
/// # Examples
///
/// ```
/// use qf::simulation::StateVectorBackend;
/// use qf::vm::{Interpreter, InterpreterOptions, Program, RunStatus};
///
/// let program = Program::parse("+>@0:", false).unwrap();
/// let mut vm = Interpreter::new(StateVectorBackend::new(), InterpreterOptions::default().with_seed(1));
/// let report = vm.run(&program, 2).unwrap();
/// assert_eq!(report.status, RunStatus::Halted);
/// assert_eq!(report.history.len(), 4);
/// assert_eq!(report.circuit.len(), 2);
/// ```
#[derive(Debug)]
pub struct Interpreter<B: Backend> {
    backend: B,
    options: InterpreterOptions,
}

impl<B: Backend> Interpreter<B> {
    /// Creates an interpreter over `backend`.
    pub fn new(backend: B, options: InterpreterOptions) -> Self {
        Self { backend, options }
    }

    /// The options used for every run.
    pub fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs `program` on a fresh register of `register_size` qubits.
    ///
    /// # Returns
    /// * `Ok(RunReport)` once the run reaches a terminal status. Runtime
    ///   failures are reported through [`RunStatus::Errored`] alongside the
    ///   partial history and circuit.
    /// * `Err(QfError)` when the run cannot start: invalid register size,
    ///   invalid initial state, or a backend that fails to allocate.
    pub fn run(&mut self, program: &Program, register_size: usize) -> Result<RunReport, QfError> {
        let register = Register::new(register_size)?;
        let mut handle = self.backend.allocate(register_size)?;
        prepare_initial_state(&mut self.backend, &mut handle, register_size, &self.options.initial_state)?;

        let rng = RandomSource::from_seed_option(self.options.seed);
        info!(tokens = program.len(), qubits = register_size, seed = ?self.options.seed, "run started");

        let mut machine = Machine {
            handle,
            register,
            circuit: Circuit::new(register_size),
            history: History::new(),
            rng,
            estimates: vec![None; register_size],
            pc: 0,
            collapse_on_measure: self.options.collapse_on_measure,
            trace_states: self.options.trace_states,
        };

        let mut status = loop {
            let Some(token) = program.token(machine.pc).copied() else {
                break RunStatus::Halted;
            };
            if self.options.is_cancelled() {
                info!(step = machine.history.len(), "run cancelled");
                break RunStatus::Cancelled;
            }
            if let Some(limit) = self.options.max_steps {
                if machine.history.len() >= limit {
                    warn!(limit, "step limit reached");
                    break RunStatus::StepLimitExceeded { limit };
                }
            }
            if let Err(error) = machine.step(&mut self.backend, program, token) {
                let err = RunError { step: machine.history.len(), program_counter: machine.pc, error };
                warn!(error = %err, "run aborted");
                break RunStatus::Errored(err);
            }
        };

        let final_state = match self.backend.amplitude_snapshot(&machine.handle) {
            Ok(state) => Some(state),
            Err(error) => {
                if status.error().is_none() {
                    status = RunStatus::Errored(RunError {
                        step: machine.history.len(),
                        program_counter: machine.pc,
                        error,
                    });
                } else {
                    warn!(%error, "final state unavailable");
                }
                None
            }
        };

        info!(
            status = %status,
            steps = machine.history.len(),
            gates = machine.circuit.len(),
            "run finished"
        );

        Ok(RunReport {
            status,
            history: machine.history,
            circuit: machine.circuit,
            final_pointer: machine.register.pointer(),
            final_state,
            seed: machine.rng.seed(),
        })
    }
}

/// Parses `text` and runs it on the dense state-vector backend.
///
/// # Errors
/// Parse, loop-balance and configuration errors are returned before anything
/// executes. Runtime failures come back inside the report.
///
/// # Examples
/// ```
/// use qf::vm::{interpret, InterpreterOptions};
///
/// let report = interpret("+:", 1, InterpreterOptions::default()).unwrap();
/// let estimate = report.history.sequence()[1].estimate.unwrap();
/// assert!((estimate.p1 - 0.5).abs() < 1e-9);
/// ```
pub fn interpret(text: &str, register_size: usize, options: InterpreterOptions) -> Result<RunReport, QfError> {
    let program = Program::parse(text, options.skip_unknown)?;
    Interpreter::new(StateVectorBackend::new(), options).run(&program, register_size)
}

fn prepare_initial_state<B: Backend>(
    backend: &mut B,
    handle: &mut B::Handle,
    register_size: usize,
    initial: &InitialState,
) -> Result<(), QfError> {
    match initial {
        InitialState::Zero => Ok(()),
        InitialState::Basis(bits) => {
            let dim = 1usize << register_size;
            let binary = !bits.is_empty() && bits.chars().all(|c| c == '0' || c == '1');
            let index = Some(bits.as_str())
                .filter(|_| binary)
                .and_then(|bits| usize::from_str_radix(bits, 2).ok())
                .filter(|&index| index < dim)
                .ok_or_else(|| QfError::InvalidState {
                    message: format!("'{}' is not a basis state of {} qubits", bits, register_size),
                })?;
            let mut amplitudes = vec![Complex::zero(); dim];
            amplitudes[index] = Complex::new(1.0, 0.0);
            backend.load_state(handle, &amplitudes)
        }
        InitialState::Amplitudes(amplitudes) => backend.load_state(handle, amplitudes),
    }
}

/// Per-run mutable state.
struct Machine<H> {
    handle: H,
    register: Register,
    circuit: Circuit,
    history: History,
    rng: RandomSource,
    /// Latest estimate per qubit, valid until the register state changes.
    estimates: Vec<Option<ProbabilityEstimate>>,
    pc: usize,
    collapse_on_measure: bool,
    trace_states: bool,
}

impl<H> Machine<H> {
    /// Executes one token and records it. On error nothing is recorded and the
    /// program counter stays on the failing token.
    fn step<B>(&mut self, backend: &mut B, program: &Program, token: Token) -> Result<(), QfError>
    where
        B: Backend<Handle = H>,
    {
        let pc = self.pc;
        let mut next_pc = pc + 1;
        let mut estimate = None;
        let mut outcome = None;
        let mut queried = false;

        debug!(
            step = self.history.len(),
            pc,
            pointer = self.register.pointer(),
            command = %token.command,
            "dispatch"
        );

        match token.command {
            Command::PointerRight => self.register.advance(),
            Command::PointerLeft => self.register.retreat(),
            Command::Gate(kind) => {
                self.apply(backend, GateRecord::single(kind, self.register.pointer()))?;
            }
            Command::ControlledX { target } => {
                let target = match target {
                    Some(index) => self.register.check(index)?,
                    None => self.register.neighbour(),
                };
                self.apply(backend, GateRecord::controlled_x(self.register.pointer(), target))?;
            }
            Command::Estimate => {
                estimate = Some(self.query(backend)?);
                queried = true;
            }
            Command::Reset => {
                backend.reset_to_zero(&mut self.handle)?;
                self.invalidate_estimates();
            }
            Command::Randomize => {
                backend.randomize_state(&mut self.handle, &mut self.rng)?;
                self.invalidate_estimates();
            }
            Command::LoopOpen => {}
            Command::LoopClose => {
                let qubit = self.register.pointer();
                let cached = self.estimates[qubit];
                let est = match cached {
                    Some(cached) => cached,
                    None => self.query(backend)?,
                };
                let sampled = est.sample(&mut self.rng);
                debug!(qubit, p1 = est.p1, outcome = %sampled, "loop close sampled");
                if self.collapse_on_measure {
                    backend.collapse(&mut self.handle, qubit, sampled)?;
                    self.invalidate_estimates();
                }
                if sampled == Outcome::One {
                    let open = program
                        .brackets()
                        .matching(pc)
                        .ok_or(QfError::UnbalancedLoop { bracket: ']', offset: token.offset })?;
                    next_pc = open + 1;
                }
                estimate = Some(est);
                outcome = Some(sampled);
                queried = true;
            }
            Command::RandomGate => {
                let kind = if self.rng.coin() { GateKind::Hadamard } else { GateKind::PhasePlus };
                self.apply(backend, GateRecord::single(kind, self.register.pointer()))?;
            }
            Command::RandomPointer => {
                let index = self.rng.index(self.register.size());
                self.register.jump(index);
            }
            Command::RandomJump => {
                next_pc = self.rng.index(program.len());
            }
        }

        let state = if queried || self.trace_states {
            Some(backend.amplitude_snapshot(&self.handle)?)
        } else {
            None
        };

        self.history.append(MachineState {
            step: self.history.len(),
            command: token.command,
            program_counter: pc,
            pointer: self.register.pointer(),
            estimate,
            outcome,
            state,
            circuit_len: self.circuit.len(),
        });
        self.pc = next_pc;
        Ok(())
    }

    /// Sends a gate to the backend, then logs it.
    fn apply<B>(&mut self, backend: &mut B, gate: GateRecord) -> Result<(), QfError>
    where
        B: Backend<Handle = H>,
    {
        backend.apply_gate(&mut self.handle, &gate)?;
        self.invalidate_estimates();
        self.circuit.append(gate)
    }

    /// Non-collapsing estimate of the pointer qubit, cached until the next state change.
    fn query<B>(&mut self, backend: &B) -> Result<ProbabilityEstimate, QfError>
    where
        B: Backend<Handle = H>,
    {
        let qubit = self.register.pointer();
        let est = backend.probabilities(&self.handle, qubit)?;
        debug!(estimate = %est, "estimate");
        self.estimates[qubit] = Some(est);
        Ok(est)
    }

    fn invalidate_estimates(&mut self) {
        self.estimates.fill(None);
    }
}
