//! Deterministic pseudo-random buffers for reference vectors and benches
//!
//! SplitMix64, emitted as little-endian words. Simple enough to reproduce
//! in any language, which is what makes the published chunk boundaries
//! checkable elsewhere.

fn splitmix64_next(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// `n` bytes of SplitMix64 output seeded with `seed`.
pub fn create_random_data(n: usize, seed: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(n + 7);
    let mut state = seed;
    while out.len() < n {
        out.extend_from_slice(&splitmix64_next(&mut state).to_le_bytes());
    }
    out.truncate(n);
    out
}
