//! Injectable noise sources.
//!
//! Every sensor owns its own source, so a test can hand in a fixed sequence
//! and a simulation a seeded generator, without any global state.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use std::fmt;

/// Source of standard-normal samples.
pub trait NoiseSource: Send + fmt::Debug {
    /// Next sample of N(0, 1).
    fn standard_normal(&mut self) -> f64;

    /// Next sample of N(0, σ²).
    fn gaussian(&mut self, stddev: f64) -> f64 {
        if stddev == 0.0 {
            // still consume a draw so sequences stay aligned across sensors
            self.standard_normal();
            return 0.0;
        }
        stddev * self.standard_normal()
    }
}

/// Seeded Gaussian generator, reproducible across runs.
#[derive(Clone, Debug)]
pub struct GaussianNoise {
    rng: ChaCha8Rng,
}

impl GaussianNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for GaussianNoise {
    fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
#[derive(Clone, Debug, Default)]
pub struct FixedNoise {
    values: Vec<f64>,
    next: usize,
}

impl FixedNoise {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl NoiseSource for FixedNoise {
    fn standard_normal(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

/// Always zero: noiseless simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn standard_normal(&mut self) -> f64 {
        0.0
    }
}
