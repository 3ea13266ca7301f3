//! Seeded random streams for event generation.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

/// Random stream owned by one event generator.
///
/// Sequential runs seed it with the master seed directly. Sharded runs give
/// shard `i` the stream [`RngHandle::for_shard`]`(master, i)`, whose seed is
/// SipHash-1-3 of `(master, i)` under zero keys and therefore platform
/// independent.
#[derive(Debug, Clone)]
pub struct RngHandle {
    rng: StdRng,
    seed: u64,
}

impl RngHandle {
    /// Stream seeded with `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Stream of shard `shard` in a run seeded with `master_seed`.
    pub fn for_shard(master_seed: u64, shard: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, shard))
    }

    /// Seed this stream was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw from `(0, 1]`, safe to raise to negative powers.
    pub fn open_unit(&mut self) -> f64 {
        1.0 - self.rng.gen::<f64>()
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Seed of substream `substream` (a shard index) of `master_seed`.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
