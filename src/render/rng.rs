use std::fmt::Debug;

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Uniform randomness as the simulation consumes it.
///
/// Everything random in the renderer (cell jitter, blob spawns, atlas bias)
/// goes through this seam so tests can supply fixed sequences and `--seed`
/// can make a whole run reproducible.
pub trait RandomSource: Debug {
    /// Next uniform float in [0, 1).
    fn next_f32(&mut self) -> f32;

    /// Uniform float in [lo, hi).
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// Process-default randomness.
#[derive(Debug)]
pub struct ThreadSource(rand::rngs::ThreadRng);

impl ThreadSource {
    #[must_use]
    pub fn new() -> Self {
        Self(rand::rng())
    }
}

impl Default for ThreadSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadSource {
    fn next_f32(&mut self) -> f32 {
        self.0.random()
    }
}

/// Deterministic randomness for `--seed` runs.
#[derive(Debug)]
pub struct SeededSource(StdRng);

impl SeededSource {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededSource {
    fn next_f32(&mut self) -> f32 {
        self.0.random()
    }
}

/// Cycles through a fixed list of values. Test fixture.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    /// Values are clamped into [0, 1) so fixtures cannot break the contract.
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            cursor: 0,
        }
    }

    /// A single repeated value.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 0.999_999)
    }
}
