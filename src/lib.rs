//! # Sandglass
//!
//! Deterministic risk-economy run simulator: a solo or small co-op party
//! descends through procedurally assembled chambers of a sealed
//! hourglass, claiming relics and stabilizing mechanisms while two
//! resources - bounded sanity and capped temporal momentum - decide
//! whether the run ends in escape or collapse.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SANDGLASS                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Xorshift128+ PRNG + derived sub-streams   │
//! │  └── hash.rs     - State digests for verification            │
//! │                                                              │
//! │  game/           - Run simulation (deterministic)            │
//! │  ├── config.rs   - Modes, lengths, party scaling             │
//! │  ├── state.rs    - Resources, flux machine, scene state      │
//! │  ├── tick.rs     - Fixed-cadence pressure loop               │
//! │  ├── effect.rs   - Tagged effect lists + resolver            │
//! │  ├── artifact.rs - Relic catalog, weighted + gacha draws     │
//! │  ├── scene.rs    - Chamber blueprints as pure data           │
//! │  ├── intent.rs   - Player intent entry point                 │
//! │  └── story.rs    - Cosmetic flavor from derived streams      │
//! │                                                              │
//! │  content/        - Pluggable sources + embedded fallback     │
//! │                                                              │
//! │  session/        - Replication (non-deterministic edge)      │
//! │  ├── protocol.rs - Snapshot + session messages               │
//! │  ├── pubsub.rs   - Transport seam + durable descriptor       │
//! │  ├── replicate.rs- Host session / read-only client mirror    │
//! │  └── invite.rs   - Shareable session links                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are 100% deterministic:
//! - BTreeMap/BTreeSet everywhere state is iterated
//! - No system time dependencies
//! - All gameplay randomness from one seeded Xorshift128+ stream;
//!   cosmetic text from derived per-key sub-streams that never touch it
//!
//! Given the same 32-bit seed and the same ordered intent/tick script,
//! the simulation produces identical state on any platform. The session
//! layer replicates that state host-authoritatively: one writable
//! simulation per session, full snapshots out, wholesale apply on
//! read-only client mirrors.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod content;
pub mod core;
pub mod game;
pub mod session;

// Re-export commonly used types
pub use crate::content::{ArtifactDataSource, ContentError, GameContent, ModeConfigSource};
pub use crate::core::rng::{derive_rng, derive_seed, SeededRng};
pub use crate::game::config::{PartyMode, PartyScaling, RosterEntry, RunConfig, TICK_INTERVAL_MS};
pub use crate::game::intent::{apply_intent, Intent, IntentOutcome};
pub use crate::game::state::{RunOutcome, RunSimulation, TemporalState};
pub use crate::game::tick::tick;
pub use crate::session::{
    ClientMirror, HostSession, RunSnapshot, SessionMessage, PROTOCOL_VERSION,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
