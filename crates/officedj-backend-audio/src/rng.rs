//! Seeded noise streams for offline rendering.
//!
//! Every triggered note draws from its own PCG32 stream keyed by where it
//! sits in the loop, so one hit's noise never depends on how many hits were
//! rendered before it.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// A PCG32 stream for a 32-bit seed.
pub fn noise_rng(seed: u32) -> Pcg32 {
    Pcg32::seed_from_u64(u64::from(seed).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Seed for one event: the first four bytes of `BLAKE3(engine_seed_le || key)`.
pub fn event_seed(engine_seed: u32, key: &str) -> u32 {
    let digest = blake3::Hasher::new()
        .update(&engine_seed.to_le_bytes())
        .update(key.as_bytes())
        .finalize();
    let mut word = [0u8; 4];
    word.copy_from_slice(&digest.as_bytes()[..4]);
    u32::from_le_bytes(word)
}

/// The noise stream for the event named `key`.
pub fn event_rng(engine_seed: u32, key: &str) -> Pcg32 {
    noise_rng(event_seed(engine_seed, key))
}
