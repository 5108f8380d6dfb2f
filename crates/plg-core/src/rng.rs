//! Deterministic RNG wrappers for path generation.
//!
//! # Determinism strategy
//!
//! Batch generation gives every requested path its own `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (path_index * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive indices uniformly across the seed space.  This
//! means:
//!
//! - Paths never share RNG state, so a batch produces the same paths whether
//!   it runs sequentially or on a thread pool.
//! - Asking for more paths does not disturb the first ones — batches of
//!   different sizes agree on their common prefix.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Deterministic RNG for one generation session.
///
/// Single-session use only.  For parallel batches derive one per path with
/// [`PlgRng::for_path`] rather than sharing.
pub struct PlgRng(SmallRng);

impl PlgRng {
    pub fn new(seed: u64) -> Self {
        PlgRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed deterministically from the run's global seed and a path index.
    pub fn for_path(global_seed: u64, path_index: u64) -> Self {
        let seed = global_seed ^ path_index.wrapping_mul(MIXING_CONSTANT);
        PlgRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `PlgRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> PlgRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        PlgRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
