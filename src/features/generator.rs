//! Synthetic feature vectors: each value is the mean of six uniform samples
//! in [-1, 1], an Irwin-Hall approximation of a normal centred at 0.

use super::FEATURE_COUNT;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

const SAMPLES_PER_VALUE: usize = 6;
const DECIMALS: f64 = 1e8;

pub struct FeatureGenerator<R: Rng = ThreadRng> {
    rng: R,
}

impl FeatureGenerator<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for FeatureGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureGenerator<StdRng> {
    /// Reproducible generator for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> FeatureGenerator<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// One value rounded to 8 decimal places.
    pub fn sample(&mut self) -> f64 {
        let sum: f64 = (0..SAMPLES_PER_VALUE)
            .map(|_| self.rng.gen_range(-1.0f64..=1.0))
            .sum();
        let mean = sum / SAMPLES_PER_VALUE as f64;
        (mean * DECIMALS).round() / DECIMALS
    }

    /// A full V1..V28 vector.
    pub fn generate(&mut self) -> Vec<f64> {
        (0..FEATURE_COUNT).map(|_| self.sample()).collect()
    }
}

/// Unseeded vector from the thread RNG.
pub fn generate_feature_vector() -> Vec<f64> {
    FeatureGenerator::new().generate()
}
