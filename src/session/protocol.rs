//! Replication Protocol Messages
//!
//! Wire format for the same-origin pub/sub channel. Messages are JSON
//! for debugging ease; the flat snapshot struct also serializes to
//! binary (bincode) where a transport wants it.
//!
//! There is deliberately no sequence number beyond session-id equality:
//! the channel is lossy and unordered and the protocol is last-snapshot-
//! wins. A late out-of-order `state` message can overwrite fresher
//! client state; this matches the source system and is documented, not
//! silently fixed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::config::PartyMode;
use crate::game::state::{
    LogEntry, Player, PlayerStatus, RunOutcome, RunSimulation, SceneState, SearchProfile,
    TemporalState,
};

/// Bumped whenever the snapshot shape changes incompatibly.
pub const PROTOCOL_VERSION: u32 = 1;

/// One roster member as carried on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub max_sanity: f64,
    pub sanity: f64,
    pub status: PlayerStatus,
}

impl PlayerInfo {
    /// Project a roster member onto the wire.
    pub fn capture(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            max_sanity: player.max_sanity,
            sanity: player.sanity,
            status: player.status(),
        }
    }
}

/// The small immutable descriptor needed to reconstruct an equivalent
/// run locally: seed, mode, length, roster, party mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptor {
    pub session_id: Uuid,
    pub mode_key: String,
    pub length_key: String,
    pub seed: u32,
    pub players: Vec<PlayerInfo>,
    pub party_mode: PartyMode,
}

/// Per-instance scene state as carried in a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneStateSnapshot {
    pub resolved_hotspots: Vec<String>,
    pub puzzles: BTreeMap<String, bool>,
    pub flags: BTreeMap<String, bool>,
    pub dialogues: BTreeMap<String, String>,
    pub discovered_artifacts: Vec<String>,
    pub search_profiles: BTreeMap<String, SearchProfile>,
    pub visited: bool,
}

impl SceneStateSnapshot {
    fn capture(state: &SceneState) -> Self {
        Self {
            resolved_hotspots: state.resolved_hotspots.iter().cloned().collect(),
            puzzles: state.puzzles.clone(),
            flags: state.flags.clone(),
            dialogues: state.dialogues.clone(),
            discovered_artifacts: state.discovered_artifacts.iter().cloned().collect(),
            search_profiles: state.search_profiles.clone(),
            visited: state.visited,
        }
    }
}

/// The full serializable projection of a run, broadcast wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub sanity: f64,
    pub drain_rate: f64,
    pub temporal_state: TemporalState,
    pub temporal_momentum: f64,
    pub temporal_event_ticks: u32,
    pub tick_count: u64,
    pub cleared_rooms: u32,
    pub run_total: Option<u32>,
    pub current_scene_index: usize,
    pub progress_total: u32,
    pub inventory: Vec<String>,
    pub gacha_charges: u32,
    pub players: Vec<PlayerInfo>,
    pub scene_state: BTreeMap<String, SceneStateSnapshot>,
    pub logs: Vec<LogEntry>,
    pub game_over: bool,
    pub outcome: Option<RunOutcome>,
}

impl RunSnapshot {
    /// Project the full simulation into its wire shape.
    pub fn capture(sim: &RunSimulation) -> Self {
        Self {
            sanity: sim.sanity,
            drain_rate: sim.drain_rate,
            temporal_state: sim.temporal_state,
            temporal_momentum: sim.momentum,
            temporal_event_ticks: sim.event_ticks,
            tick_count: sim.tick_count,
            cleared_rooms: sim.cleared_rooms,
            run_total: sim.run_total,
            current_scene_index: sim.current_scene_index,
            progress_total: sim.scene_queue.len() as u32,
            inventory: sim
                .inventory
                .iter()
                .map(|entry| entry.artifact_id.clone())
                .collect(),
            gacha_charges: sim.gacha_charges,
            players: sim.players.iter().map(PlayerInfo::capture).collect(),
            scene_state: sim
                .scene_states
                .iter()
                .map(|(key, state)| (key.clone(), SceneStateSnapshot::capture(state)))
                .collect(),
            logs: sim.logs.clone(),
            game_over: sim.game_over,
            outcome: sim.outcome,
        }
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

/// Messages exchanged over the session channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionMessage {
    /// Host announces a new session and its descriptor.
    #[serde(rename_all = "camelCase")]
    SessionStart {
        session_id: Uuid,
        config: SessionDescriptor,
    },

    /// Host publishes the full current snapshot.
    #[serde(rename_all = "camelCase")]
    State {
        session_id: Uuid,
        protocol_version: u32,
        config: SessionDescriptor,
        snapshot: Box<RunSnapshot>,
    },

    /// A client asks the host to resend the current snapshot.
    #[serde(rename_all = "camelCase")]
    StateRequest { session_id: Uuid },

    /// Host or a leaving client announces teardown.
    #[serde(rename_all = "camelCase")]
    SessionEnd { session_id: Uuid },
}

impl SessionMessage {
    /// The session this message belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionMessage::SessionStart { session_id, .. }
            | SessionMessage::State { session_id, .. }
            | SessionMessage::StateRequest { session_id }
            | SessionMessage::SessionEnd { session_id } => *session_id,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// TESTS
// =============================================================================
