//! FNV-1a, 32-bit variant.
//!
//! The table derives bucket indices from [`fnv1a`]. It is fast and deterministic,
//! and it is not collision resistant: never use it where keys come from an adversary
//! and worst-case chain length matters.

use std::hash::{BuildHasher, Hasher};

/// FNV-1a 32-bit offset basis
pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime
pub const FNV_PRIME: u32 = 16_777_619;

/// Hashes `bytes` with FNV-1a: for every byte, XOR it into the state, then multiply
/// by [`FNV_PRIME`] with 32-bit wrapping arithmetic.
#[must_use]
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(FNV_OFFSET_BASIS, |hash, &byte| (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME))
}

/// Streaming [`Hasher`] over the same function, so other containers can be keyed
/// with it (the benchmarks use it with `std::collections::HashMap`).
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher {
    /// Running 32-bit state
    hash: u32,
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self { hash: FNV_OFFSET_BASIS }
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        u64::from(self.hash)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.hash = (self.hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME);
        }
    }
}

/// Builds [`FnvHasher`]s with the standard offset basis
#[derive(Debug, Clone, Copy, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> Self::Hasher {
        FnvHasher::default()
    }
}
