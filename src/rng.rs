//! Deterministic PRNG: a single 31-bit linear congruential generator used
//! for every stochastic draw during birth, and for the birth-hash digest.
//!
//! `spec.md` §4.2 requires this to be bit-identical across platforms; the
//! arithmetic here matches `original_source/phase2-core/libAeon/libAeon.c`'s
//! `aeon_random` exactly (`u32` wrapping multiply-add, masked to 31 bits).

#![forbid(unsafe_code)]

/// `s <- (s * 1103515245 + 12345) mod 2^31`.
#[derive(Debug, Clone, Copy)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Seed a new generator.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the generator and return the new state.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1_103_515_245)
            .wrapping_add(12_345)
            & 0x7FFF_FFFF;
        self.state
    }
}

/// Derive the 16-byte birth hash from `seed XOR birth_time`, per
/// `spec.md` §4.2/§4.3 step 3. Runs an `Lcg` independent from the one used
/// to draw weights, seeded separately (`original_source` `generate_hash`).
pub fn birth_hash(seed: u32, birth_time: u32) -> [u8; 16] {
    let mut rng = Lcg::new(seed ^ birth_time);
    let mut bytes = [0u8; 16];
    for b in &mut bytes {
        *b = (rng.next_u32() & 0xFF) as u8;
    }
    bytes
}

/// Render a 16-byte hash as 32 lowercase hex characters (`spec.md` §6
/// `hash_to_string`).
pub fn hash_to_string(hash: &[u8; 16]) -> String {
    let mut s = String::with_capacity(32);
    for b in hash {
        s.push_str(&format!("{b:02x}"));
    }
    s
}
