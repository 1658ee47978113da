// src/vm/options.rs

//! Run configuration.

use num_complex::Complex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// State the register is prepared in before the first command runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InitialState {
    /// |0...0>.
    #[default]
    Zero,
    /// A computational basis state given as a binary string, read as the basis
    /// index: `"01"` is index 1, i.e. qubit 0 set and qubit 1 clear.
    Basis(String),
    /// Explicit amplitudes; must have 2^n entries and unit norm.
    Amplitudes(Vec<Complex<f64>>),
}

/// Cooperative stop signal, checked by the interpreter once per step.
///
/// Clones share the same flag, so a token handed to a run on another thread
/// can be cancelled from here.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every run holding a clone of this token to stop before its next step.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Options for a single run.
///
/// # Examples
/// ```
/// use qf::vm::InterpreterOptions;
///
/// let options = InterpreterOptions::default()
///     .with_seed(42)
///     .with_max_steps(1_000)
///     .skip_unknown(true);
/// assert_eq!(options.seed, Some(42));
/// assert!(!options.collapse_on_measure);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InterpreterOptions {
    /// Seed for the run's random source; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Stop with `StepLimitExceeded` after this many steps; `None` is unbounded.
    pub max_steps: Option<usize>,
    /// Apply the outcome sampled by `]` to the register as a measurement.
    pub collapse_on_measure: bool,
    /// Drop whitespace and unknown characters instead of failing the parse.
    pub skip_unknown: bool,
    /// Register preparation before the first step.
    pub initial_state: InitialState,
    /// Store an amplitude snapshot in every history entry.
    pub trace_states: bool,
    /// Cooperative cancellation.
    pub cancellation: Option<CancellationToken>,
}

impl InterpreterOptions {
    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bounds the number of executed steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Sets whether `]` collapses the sampled qubit.
    pub fn collapse_on_measure(mut self, collapse: bool) -> Self {
        self.collapse_on_measure = collapse;
        self
    }

    /// Sets whether the parser skips unknown characters.
    pub fn skip_unknown(mut self, skip: bool) -> Self {
        self.skip_unknown = skip;
        self
    }

    /// Sets the initial register state.
    pub fn with_initial_state(mut self, state: InitialState) -> Self {
        self.initial_state = state;
        self
    }

    /// Sets whether every history entry carries an amplitude snapshot.
    pub fn trace_states(mut self, trace: bool) -> Self {
        self.trace_states = trace;
        self
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}
