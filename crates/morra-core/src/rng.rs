//! Random number generator abstraction for determinism.
//!
//! In production, this wraps an OS-seeded `StdRng`. In tests, a seeded or
//! scripted implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by `StdRng`.
///
/// Shared process-wide behind a mutex, every caller draws from the same
/// stream, so simultaneous requests never replay each other's values.
#[derive(Debug)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Creates an RNG seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Creates an RNG with a fixed seed for reproducible sequences.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_rng_stays_within_inclusive_bounds() {
        let mut rng = SystemRng::from_entropy();

        for _ in 0..1_000 {
            let value = rng.next_u32_range(1, 5);
            assert!((1..=5).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut first = SystemRng::seeded(42);
        let mut second = SystemRng::seeded(42);

        let a: Vec<u32> = (0..16).map(|_| first.next_u32_range(1, 5)).collect();
        let b: Vec<u32> = (0..16).map(|_| second.next_u32_range(1, 5)).collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_range_returns_bound() {
        let mut rng = SystemRng::seeded(7);

        assert_eq!(rng.next_u32_range(3, 3), 3);
    }
}
