//! Display attributes with no authoritative source (`rating`, `reviews`).
//!
//! The reconciler asks an [`AttributeGenerator`] once per product per build.
//! Values are not stable across builds.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait AttributeGenerator {
    /// One decimal place, within `[4.0, 5.0)`.
    fn rating(&mut self) -> f64;
    /// Within `[50, 250)`.
    fn reviews(&mut self) -> u32;
}

/// Uniformly random attributes.
#[derive(Debug)]
pub struct RandomAttributes<R: Rng = StdRng> {
    rng: R,
}

impl RandomAttributes<StdRng> {
    /// Seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAttributes<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> AttributeGenerator for RandomAttributes<R> {
    fn rating(&mut self) -> f64 {
        // Drawn in tenths so rounding can never reach 5.0.
        f64::from(self.rng.random_range(40_u32..50)) / 10.0
    }

    fn reviews(&mut self) -> u32 {
        self.rng.random_range(50..250)
    }
}

/// Constant attributes, for tests and reproducible exports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAttributes {
    pub rating: f64,
    pub reviews: u32,
}

impl AttributeGenerator for FixedAttributes {
    fn rating(&mut self) -> f64 {
        self.rating
    }

    fn reviews(&mut self) -> u32 {
        self.reviews
    }
}
