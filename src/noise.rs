//! Stateless per-pixel random field
//!
//! Every random decision in the renderers is a pure function of
//! `(pixel index, tick, seed)`, so a frame can be recomputed bit for bit and
//! pixels can be visited in any order.

/// SplitMix64 finalizer
#[inline]
const fn mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Random sample for a pixel at a tick
///
/// Identical inputs always produce the identical sample.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn field_sample(pixel: u32, tick: u64, seed: u32) -> u16 {
    let key = ((seed as u64) << 32) | pixel as u64;
    let z = mix64(mix64(key) ^ tick);
    // Fold the high half in so every input bit reaches the output
    ((z ^ (z >> 32) ^ (z >> 16)) & 0xFFFF) as u16
}

/// Random field bound to one effect instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomField {
    seed: u32,
}

impl RandomField {
    pub const fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub const fn seed(self) -> u32 {
        self.seed
    }

    /// Sample the field at a pixel and tick
    #[inline]
    pub const fn sample(self, pixel: u32, tick: u64) -> u16 {
        field_sample(pixel, tick, self.seed)
    }

    /// Derive an independent field for a separate stream of draws
    #[allow(clippy::cast_possible_truncation)]
    pub const fn fork(self, stream: u32) -> Self {
        let mixed = mix64(((self.seed as u64) << 32) | stream as u64);
        Self {
            seed: (mixed ^ (mixed >> 32)) as u32,
        }
    }
}

/// Derive the seed of the `index`-th instance from a base seed
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn derive_seed(base: u32, index: u32) -> u32 {
    let mixed = mix64(((base as u64) << 32) | index as u64);
    (mixed >> 16) as u32
}
