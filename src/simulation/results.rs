// src/simulation/results.rs
use crate::core::{Outcome, RandomSource};
use std::fmt;

/// A non-collapsing readout of one qubit: the probabilities of observing
/// |0> and |1>, computed from the amplitude magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityEstimate {
    /// The qubit that was estimated.
    pub qubit: usize,
    /// Probability of observing 0.
    pub p0: f64,
    /// Probability of observing 1.
    pub p1: f64,
}

impl ProbabilityEstimate {
    /// Turns the estimate into a discrete outcome using `rng`.
    ///
    /// Draws `u` uniformly from `[0, 1)` and returns `One` when `u < p1`, so an
    /// estimate with `p1 == 0` always yields `Zero` and one with `p1 >= 1`
    /// always yields `One`. Consumes exactly one draw either way.
    pub fn sample(&self, rng: &mut RandomSource) -> Outcome {
        let u = rng.unit();
        if u < self.p1 { Outcome::One } else { Outcome::Zero }
    }
}

impl fmt::Display for ProbabilityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}: P(0)={:.4}, P(1)={:.4}", self.qubit, self.p0, self.p1)
    }
}
