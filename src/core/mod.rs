//! Deterministic primitives.
//!
//! Everything in this module is platform-independent and free of system
//! entropy: the simulation must replay bit-for-bit from a recorded seed.

pub mod hash;
pub mod rng;

pub use self::hash::{StateDigest, StateHasher};
pub use self::rng::{derive_rng, derive_seed, SeededRng};
