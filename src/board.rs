//! External collaborators mutated during a poll
//!
//! The board bundles the output driver with the random source so the
//! choreography can reconfigure lights and roll dice through one handle.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::OutputDriver;

/// Uniform random integer source
pub trait RandomSource {
    /// Returns an integer in `[low, high)`, or `low` when the range is empty
    fn uniform(&mut self, low: u32, high: u32) -> u32;
}

impl RandomSource for SmallRng {
    fn uniform(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.gen_range(low..high)
    }
}

/// Output driver and random source owned by the show
#[derive(Debug)]
pub struct Board<O: OutputDriver, R: RandomSource> {
    pub output: O,
    pub rng: R,
}

impl<O: OutputDriver, R: RandomSource> Board<O, R> {
    pub const fn new(output: O, rng: R) -> Self {
        Self { output, rng }
    }
}

/// Build a seed from analog noise samples.
///
/// Takes the low nibble of each sample (floating inputs only carry noise in
/// the low bits) and shifts them in, first sample ending up most significant.
/// Only the last 16 samples fit in the seed.
pub fn seed_from_noise<I>(samples: I) -> u64
where
    I: IntoIterator<Item = u16>,
{
    samples
        .into_iter()
        .fold(0u64, |seed, sample| (seed << 4) | u64::from(sample & 0x0f))
}

/// Create the random source used on hardware
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
