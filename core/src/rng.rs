//! Random Number Generator.

use crate::pbrt::*;

/// 32-bit precision value for 1 - epsilon.
pub const FLOAT_ONE_MINUS_EPSILON: f32 = hexf32!("0x1.fffffep-1"); // 0.99999994

/// 1 - epsilon in the precision we've selected for `Float`.
pub const ONE_MINUS_EPSILON: Float = FLOAT_ONE_MINUS_EPSILON;

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// Implements the PCG32 pseudo-random number generator.
#[derive(Clone, Debug)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    /// Return a new instance of `RNG` with default state and stream.
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new `RNG` on the given sequence starting at `offset`.
    ///
    /// * `sequence_index` - Selects one of the 2^63 independent streams.
    /// * `offset`         - Seeds the starting state within the stream.
    pub fn new(sequence_index: u64, offset: u64) -> Self {
        let mut ret = Self { state: 0, inc: 0 };
        ret.set_sequence(sequence_index, offset);
        ret
    }

    /// Reinitialize the random number generator sequence.
    ///
    /// * `sequence_index` - Selects one of the 2^63 independent streams.
    /// * `seed`           - Seeds the starting state within the stream.
    #[inline(always)]
    pub fn set_sequence(&mut self, sequence_index: u64, seed: u64) {
        self.state = 0;
        self.inc = (sequence_index << 1) | 1;
        let _ = self.uniform_u32();
        self.state = self.state.wrapping_add(seed);
        let _ = self.uniform_u32();
    }

    /// Returns a uniformly distributed u32 value.
    #[inline(always)]
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);

        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value over the half open interval
    /// `[0, bound)`.
    ///
    /// * `bound` - The upper bound.
    pub fn bounded_uniform_u32(&mut self, bound: u32) -> u32 {
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.uniform_u32();
            if r >= threshold {
                return r % bound;
            }
        }
    }

    /// Returns a uniformly distributed value over the half open interval [0.0, 1.0).
    pub fn uniform_float(&mut self) -> Float {
        min(
            self.uniform_u32() as Float * hexf32!("0x1.0p-32") as Float,
            ONE_MINUS_EPSILON,
        )
    }

    /// Skips ahead `delta` steps in the sequence in logarithmic time.
    ///
    /// * `delta` - Number of steps. Negative values step backward.
    pub fn advance(&mut self, delta: i64) {
        let mut cur_mult = PCG32_MULT;
        let mut cur_plus = self.inc;
        let mut acc_mult = 1u64;
        let mut acc_plus = 0u64;
        let mut delta = delta as u64;
        while delta > 0 {
            if delta & 1 != 0 {
                acc_mult = acc_mult.wrapping_mul(cur_mult);
                acc_plus = acc_plus.wrapping_mul(cur_mult).wrapping_add(cur_plus);
            }
            cur_plus = cur_mult.wrapping_add(1).wrapping_mul(cur_plus);
            cur_mult = cur_mult.wrapping_mul(cur_mult);
            delta /= 2;
        }
        self.state = acc_mult.wrapping_mul(self.state).wrapping_add(acc_plus);
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RNG::new(7, 42);
        let mut b = RNG::new(7, 42);
        for _ in 0..32 {
            assert_eq!(a.uniform_u32(), b.uniform_u32());
        }
    }

    #[test]
    fn different_sequences_diverge() {
        let mut a = RNG::new(1, 42);
        let mut b = RNG::new(2, 42);
        let same = (0..32).filter(|_| a.uniform_u32() == b.uniform_u32()).count();
        assert!(same < 4);
    }

    #[test]
    fn advance_matches_stepping() {
        let mut a = RNG::new(3, 9);
        let mut b = a.clone();
        for _ in 0..100 {
            let _ = a.uniform_u32();
        }
        b.advance(100);
        assert_eq!(a.uniform_u32(), b.uniform_u32());
    }

    #[test]
    fn uniform_float_in_unit_interval() {
        let mut rng = RNG::default();
        for _ in 0..1000 {
            let u = rng.uniform_float();
            assert!((0.0..1.0).contains(&u));
        }
        for _ in 0..100 {
            assert!(rng.bounded_uniform_u32(5) < 5);
        }
    }
}
