//! Seeded unit-interval random sources.
//!
//! Every draw made while composing goes through [`UnitRng`], so a profile
//! and its blueprint are reproducible from a single 32-bit seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of floats in `[0, 1)`.
pub trait UnitRng {
    /// Returns the next float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Marsaglia xorshift over 32 bits.
///
/// This is the canonical generator for composition: the same seed always
/// yields the same stream on every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Creates a generator; a zero seed is replaced by 1.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Advances the state and returns it.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl UnitRng for XorShift32 {
    fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

impl UnitRng for Pcg32 {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Creates a PCG32 generator from a 32-bit seed.
///
/// The seed is duplicated into both halves of the 64-bit state.
pub fn create_pcg(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Index in `[0, len)` chosen by one draw.
///
/// `len` must be non-zero.
pub fn index<R: UnitRng + ?Sized>(len: usize, rng: &mut R) -> usize {
    let idx = (rng.next_unit() * len as f64).floor() as usize;
    idx.min(len - 1)
}

/// Picks one item with a single draw; `None` for an empty slice.
pub fn pick<'a, T, R: UnitRng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[index(items.len(), rng)])
    }
}
