//! Injected randomness
//!
//! Generators only need "uniform pick from a set" and "uniform 0..1"; both go
//! through [`RandomSource`] so runs are reproducible from a seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Source of uniform random choices
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform value in `[0, 1)`
    fn unit(&mut self) -> f64;
}

/// Seed wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_source(self) -> SeededRng {
        SeededRng::new(self.seed)
    }
}

/// PCG-backed deterministic random source
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRng {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }

    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}
