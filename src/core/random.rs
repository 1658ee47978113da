// src/core/random.rs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::fmt;

/// The single source of randomness for one run.
///
/// Every non-deterministic command (`?`, `!`, `*`), the loop-close sampling
/// step and the state randomizer draw from the same generator, so a seeded
/// source makes a whole run reproducible. Each run owns its own source.
#[derive(Clone)]
pub struct RandomSource {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomSource {
    /// A reproducible source.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed: Some(seed) }
    }

    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_os_rng(), seed: None }
    }

    /// Seeded when `seed` is given, otherwise from entropy.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// The seed this source was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Uniform index in `[0, bound)`. `bound` must be non-zero.
    pub fn index(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Standard normal sample.
    pub fn gaussian(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource").field("seed", &self.seed).finish_non_exhaustive()
    }
}
