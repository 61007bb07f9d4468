//! Run simulation (deterministic).
//!
//! Owns the resources, the temporal flux state machine, the effect
//! resolver, and the intent entry point. Everything here replays
//! bit-for-bit from a recorded seed and intent/tick script.

pub mod artifact;
pub mod config;
pub mod effect;
pub mod intent;
pub mod scene;
pub mod state;
pub mod story;
pub mod tick;

pub use self::artifact::{Artifact, ArtifactCatalog, CatalogError, Rarity};
pub use self::config::{ModeConfig, PartyMode, PartyScaling, RosterEntry, RunConfig, RunLength};
pub use self::effect::{Effect, EffectError};
pub use self::intent::{apply_intent, Intent, IntentError, IntentOutcome};
pub use self::state::{
    LogEntry, Player, PlayerStatus, RunOutcome, RunSimulation, SceneState, TemporalState, Tone,
};
pub use self::tick::tick;
