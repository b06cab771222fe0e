//! Seeded 32-bit pseudo-random number generator
//!
//! The mixing function is Mulberry32. Its exact output is part of the demo
//! dataset's identity: changing a single operation here changes every listing
//! ever generated. All arithmetic wraps on `u32`.

use crate::traits::RandomSource;
use rand::{RngCore, SeedableRng};

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Mulberry32 generator with a single 32-bit state word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
    seed: u32,
}

impl Mulberry32 {
    /// Create a generator from a 32-bit seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed, seed }
    }

    /// Create a generator from a wider integer seed, keeping its low 32 bits
    pub fn from_seed_i64(seed: i64) -> Self {
        Self::new(seed as u32)
    }

    /// The seed this generator was constructed with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance the state and return the next 32-bit output
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Return the next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }
}

impl RandomSource for Mulberry32 {
    fn next_f64(&mut self) -> f64 {
        Mulberry32::next_f64(self)
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        Mulberry32::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(Mulberry32::next_u32(self));
        let high = u64::from(Mulberry32::next_u32(self));
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = Mulberry32::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
