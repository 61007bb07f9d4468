//! State Digests for Verification
//!
//! Deterministic hashing of run state for:
//! - Replication fidelity checks between host and client mirrors
//! - Replay validation in the demo binary and tests

use sha2::{Digest, Sha256};

/// Digest output type (256 bits / 32 bytes)
pub type StateDigest = [u8; 32];

/// Deterministic hasher for run state.
///
/// Wraps SHA-256 with helpers for the simulation's field types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for run state.
    pub fn for_run_state() -> Self {
        Self::new(b"SANDGLASS_STATE_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an f64 value (bit pattern, little-endian).
    #[inline]
    pub fn update_f64(&mut self, value: f64) {
        self.hasher.update(value.to_bits().to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a string (length-prefixed so adjacent strings cannot
    /// collide by concatenation).
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.update_u64(value.len() as u64);
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> StateDigest {
        self.hasher.finalize().into()
    }
}

/// Compute a run-state digest.
///
/// This function is called by `RunSimulation::state_digest()`.
/// The parameter is a closure that adds state-specific data.
pub fn compute_state_digest<F>(tick: u64, seed: u32, add_state: F) -> StateDigest
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_run_state();

    // Always hash tick and seed first
    hasher.update_u64(tick);
    hasher.update_u32(seed);

    // Add state-specific data
    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_digest = || {
            let mut hasher = StateHasher::for_run_state();
            hasher.update_u64(100);
            hasher.update_f64(5.5);
            hasher.update_str("pendulum-atrium#1");
            hasher.update_bool(true);
            hasher.finalize()
        };

        let digest1 = make_digest();
        let digest2 = make_digest();

        assert_eq!(digest1, digest2);
    }

    #[test]
    fn test_hash_order_matters() {
        let digest1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let digest2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(digest1, digest2);
    }

    #[test]
    fn test_domain_separation() {
        let digest1 = {
            let mut h = StateHasher::new(b"DOMAIN_A");
            h.update_bytes(&[1, 2, 3, 4]);
            h.finalize()
        };

        let digest2 = {
            let mut h = StateHasher::new(b"DOMAIN_B");
            h.update_bytes(&[1, 2, 3, 4]);
            h.finalize()
        };

        assert_ne!(digest1, digest2);
    }

    #[test]
    fn test_string_length_prefix() {
        // "ab" + "c" must not collide with "a" + "bc"
        let digest1 = {
            let mut h = StateHasher::new(b"test");
            h.update_str("ab");
            h.update_str("c");
            h.finalize()
        };

        let digest2 = {
            let mut h = StateHasher::new(b"test");
            h.update_str("a");
            h.update_str("bc");
            h.finalize()
        };

        assert_ne!(digest1, digest2);
    }

    #[test]
    fn test_compute_state_digest() {
        let digest = compute_state_digest(100, 12345, |hasher| {
            hasher.update_f64(5.0);
            hasher.update_bool(true);
        });

        // Digest should be consistent
        let digest2 = compute_state_digest(100, 12345, |hasher| {
            hasher.update_f64(5.0);
            hasher.update_bool(true);
        });

        assert_eq!(digest, digest2);

        // Different input = different digest
        let digest3 = compute_state_digest(101, 12345, |hasher| {
            hasher.update_f64(5.0);
            hasher.update_bool(true);
        });

        assert_ne!(digest, digest3);
    }
}
