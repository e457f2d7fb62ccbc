//! Hashing used to derive deterministic random streams.

use crate::geometry::*;
use crate::pbrt::*;
use byteorder::{LittleEndian, WriteBytesExt};

/// Mixes the bits of a 64-bit value so nearby inputs map to distant outputs.
///
/// * `v` - The value.
#[inline]
pub fn mix_bits(mut v: u64) -> u64 {
    v ^= v >> 31;
    v = v.wrapping_mul(0x7fb5d329728ea185);
    v ^= v >> 27;
    v = v.wrapping_mul(0x81dadef4bc2dd44d);
    v ^= v >> 33;
    v
}

/// 64-bit MurmurHash2.
///
/// * `key`  - The bytes to hash.
/// * `seed` - Hash seed.
pub fn murmur_hash_64a(key: &[u8], seed: u64) -> u64 {
    const M: u64 = 0xc6a4a7935bd1e995;
    const R: u32 = 47;

    let len = key.len();
    let mut h = seed ^ (len as u64).wrapping_mul(M);

    let mut chunks = key.chunks_exact(8);
    for chunk in &mut chunks {
        let mut k = chunk
            .iter()
            .enumerate()
            .fold(0u64, |k, (i, b)| k | ((*b as u64) << (8 * i)));
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        for (i, b) in tail.iter().enumerate() {
            h ^= (*b as u64) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

/// Accumulates values as little-endian bytes and hashes them together.
#[derive(Default)]
pub struct HashBuffer {
    bytes: Vec<u8>,
}

impl HashBuffer {
    /// Returns an empty buffer.
    pub fn new() -> Self {
        Self { bytes: Vec::with_capacity(32) }
    }

    /// Appends a float.
    ///
    /// * `v` - The value.
    pub fn float(mut self, v: Float) -> Self {
        // Writing into a Vec cannot fail.
        let _ = self.bytes.write_f32::<LittleEndian>(v);
        self
    }

    /// Appends a 64-bit integer.
    ///
    /// * `v` - The value.
    pub fn u64(mut self, v: u64) -> Self {
        let _ = self.bytes.write_u64::<LittleEndian>(v);
        self
    }

    /// Appends a vector.
    ///
    /// * `v` - The vector.
    pub fn vector(self, v: &Vector3f) -> Self {
        self.float(v.x).float(v.y).float(v.z)
    }

    /// Appends a 2-D point.
    ///
    /// * `p` - The point.
    pub fn point2(self, p: &Point2f) -> Self {
        self.float(p.x).float(p.y)
    }

    /// Returns the hash of the accumulated bytes.
    pub fn finish(&self) -> u64 {
        murmur_hash_64a(&self.bytes, 0)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_and_sensitive() {
        let w = Vector3f::new(0.1, 0.2, 0.9);
        let a = HashBuffer::new().u64(5).vector(&w).finish();
        let b = HashBuffer::new().u64(5).vector(&w).finish();
        let c = HashBuffer::new().u64(6).vector(&w).finish();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn mix_bits_spreads_neighbours() {
        assert_ne!(mix_bits(1), mix_bits(2));
        assert_eq!(mix_bits(0), 0);
    }

    #[test]
    fn murmur_handles_tails() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
        let h1 = murmur_hash_64a(&data, 0);
        let h2 = murmur_hash_64a(&data[..10], 0);
        assert_ne!(h1, h2);
    }
}
