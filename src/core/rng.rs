//! Deterministic Random Number Generation
//!
//! Uses Xorshift128+ for fast, high-quality, deterministic randomness.
//! Given the same 32-bit run seed, produces the identical float sequence
//! on all platforms, so a recorded seed fully replays a run.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Deterministic PRNG using the Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of values on any platform (x86, ARM, WASM).
///
/// All gameplay-affecting randomness (scene shuffles, artifact rolls,
/// search success indices, ambient swings, gacha draws) must flow through
/// the one active generator owned by the simulation. Cosmetic randomness
/// uses [`derive_rng`] sub-streams instead, so consuming it never
/// perturbs the gameplay sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: [u64; 2],
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SeededRng {
    /// Create a new RNG from a 32-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u32) -> Self {
        let mut s = seed as u64;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random float in [0, 1).
    ///
    /// Uses the top 53 bits so the full f64 mantissa is populated.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Generate a random float in [min, max).
    #[inline]
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        min + self.next_f64() * (max - min)
    }

    /// Generate a random index in [0, len).
    ///
    /// Simple modulo - slight bias for very large len, but acceptable.
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }

    /// Generate a random boolean that is true with the given probability.
    #[inline]
    pub fn next_bool(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Shuffle a slice in place using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        for i in (1..len).rev() {
            let j = self.next_index(i + 1);
            slice.swap(i, j);
        }
    }

    /// Select a random element from a slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.next_index(slice.len());
            Some(&slice[idx])
        }
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a sub-seed from the run seed and a string key.
///
/// Pure: identical inputs always yield the same sub-seed. Used for
/// cosmetic streams (flavor lines, scene intros, search wording) so that
/// consuming them never advances the active gameplay generator, and two
/// different keys never desynchronize each other.
pub fn derive_seed(seed: u32, key: &str) -> u32 {
    let mut hasher = Sha256::new();

    // Domain separator
    hasher.update(b"SANDGLASS_DERIVE_V1");
    hasher.update(seed.to_le_bytes());
    hasher.update(key.as_bytes());

    let hash = hasher.finalize();
    u32::from_le_bytes(hash[0..4].try_into().expect("sha256 output is 32 bytes"))
}

/// Construct an independent generator for `(seed, key)`.
///
/// Calling this twice with identical inputs yields generators producing
/// identical sequences.
pub fn derive_rng(seed: u32, key: &str) -> SeededRng {
    SeededRng::new(derive_seed(seed, key))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        // Same seed must produce same sequence
        let mut rng1 = SeededRng::new(12345);
        let mut rng2 = SeededRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        // Different seeds produce different sequences
        let mut rng1 = SeededRng::new(12345);
        let mut rng2 = SeededRng::new(54321);

        // Very unlikely to match
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = SeededRng::new(9999);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SeededRng::new(5678);

        for _ in 0..1000 {
            let val = rng.next_range(-10.0, 10.0);
            assert!((-10.0..10.0).contains(&val));
        }

        // Edge case: min = max
        assert_eq!(rng.next_range(5.0, 5.0), 5.0);
    }

    #[test]
    fn test_next_index() {
        let mut rng = SeededRng::new(1234);

        for _ in 0..1000 {
            let val = rng.next_index(100);
            assert!(val < 100);
        }

        // Edge case: empty range
        assert_eq!(rng.next_index(0), 0);

        // Edge case: single element
        assert_eq!(rng.next_index(1), 0);
    }

    #[test]
    fn test_shuffle_determinism() {
        let mut rng1 = SeededRng::new(1111);
        let mut rng2 = SeededRng::new(1111);

        let mut arr1 = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut arr2 = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        rng1.shuffle(&mut arr1);
        rng2.shuffle(&mut arr2);

        assert_eq!(arr1, arr2);
    }

    #[test]
    fn test_derive_rng_pure() {
        let mut a = derive_rng(42, "story");
        let mut b = derive_rng(42, "story");

        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_derived_streams_independent() {
        // Different keys yield different sequences
        let mut a = derive_rng(42, "A");
        let mut b = derive_rng(42, "B");
        assert_ne!(a.next_u64(), b.next_u64());

        // Consuming one derived stream never advances another, nor the
        // active stream: run the active stream with and without a side
        // stream being drained and confirm the outputs agree.
        let mut active = SeededRng::new(42);
        let control: Vec<u64> = (0..10).map(|_| active.next_u64()).collect();

        let mut active2 = SeededRng::new(42);
        let mut side = derive_rng(42, "B");
        for _ in 0..50 {
            side.next_f64();
        }
        let observed: Vec<u64> = (0..10).map(|_| active2.next_u64()).collect();

        assert_eq!(control, observed);
    }

    #[test]
    fn test_derive_seed_differs_from_base() {
        // A derived stream should not shadow the active stream.
        assert_ne!(derive_seed(42, "story"), 42);
        assert_ne!(derive_seed(42, "story"), derive_seed(43, "story"));
    }

    #[test]
    fn test_state_checkpoint() {
        let mut rng = SeededRng::new(5555);

        // Advance some
        for _ in 0..50 {
            rng.next_u64();
        }

        // Save state
        let saved_state = rng.state();

        // Advance more
        let next_values: Vec<u64> = (0..10).map(|_| rng.next_u64()).collect();

        // Restore state
        rng.set_state(saved_state);

        // Should produce same values again
        for expected in next_values {
            assert_eq!(rng.next_u64(), expected);
        }
    }
}
