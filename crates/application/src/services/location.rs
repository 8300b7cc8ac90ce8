//! Random grid locations for orders created without an address.

use domain::Location;
use rand::Rng;

/// Source of pseudo-random integers with inclusive bounds.
///
/// Kept behind a trait so tests can substitute a deterministic sequence.
pub trait RandomSource: Send + Sync {
    fn next(&self, min: i32, max: i32) -> i32;
}

/// Default random source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngRandom;

impl RandomSource for ThreadRngRandom {
    fn next(&self, min: i32, max: i32) -> i32 {
        rand::rng().random_range(min..=max)
    }
}

/// Draws uniformly distributed locations on the delivery grid.
#[derive(Debug, Clone)]
pub struct RandomLocationProvider<R: RandomSource> {
    random: R,
}

impl Default for RandomLocationProvider<ThreadRngRandom> {
    fn default() -> Self {
        Self::new(ThreadRngRandom)
    }
}

impl<R: RandomSource> RandomLocationProvider<R> {
    pub fn new(random: R) -> Self {
        Self { random }
    }

    /// Returns a random in-bounds location.
    ///
    /// The source's output is clamped onto the grid, so a misbehaving source
    /// is contained rather than propagated as a validation error.
    pub fn next_location(&self) -> Location {
        let x = self.random.next(Location::MIN.x(), Location::MAX.x());
        let y = self.random.next(Location::MIN.y(), Location::MAX.y());
        Location::clamped(x, y)
    }
}
