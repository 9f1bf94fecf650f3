//! Uniform draws used by the generators.
//!
//! Every generator owns its own `StdRng`. A fixed seed and fixed parameters
//! reproduce the same sequence of batches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigError;

/// Seeded RNG when a seed is given, entropy otherwise.
pub fn generator_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Inclusive `[min, max]` range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

impl UniformRange {
    pub fn new(name: &'static str, min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::InvalidRange { name, min, max });
        }
        Ok(Self { min, max })
    }

    /// Range of durations or delays; a negative lower bound is rejected.
    pub fn non_negative(name: &'static str, min: f64, max: f64) -> Result<Self, ConfigError> {
        if min < 0.0 {
            return Err(ConfigError::InvalidRange { name, min, max });
        }
        Self::new(name, min, max)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Inclusive integer range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformCount {
    pub min: u32,
    pub max: u32,
}

impl UniformCount {
    pub fn new(name: &'static str, min: u32, max: u32) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidRange {
                name,
                min: f64::from(min),
                max: f64::from(max),
            });
        }
        Ok(Self { min, max })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Uniform pick from a non-empty name list.
pub fn pick_name<'a, R: Rng>(rng: &mut R, names: &'a [String]) -> &'a str {
    debug_assert!(!names.is_empty(), "name list validated at construction");
    &names[rng.gen_range(0..names.len())]
}

pub fn fair_coin<R: Rng>(rng: &mut R) -> bool {
    rng.gen_bool(0.5)
}
