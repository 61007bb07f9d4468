//! Run State Definitions
//!
//! All state for one run of the hourglass. Uses BTreeMap/BTreeSet for
//! deterministic iteration order.
//!
//! The simulation is an explicit owned value with no hidden statics: it
//! is constructed fresh at run start or restart, mutated only by whoever
//! holds it (the session host), and projected into snapshots for
//! replication.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::content::GameContent;
use crate::core::hash::{compute_state_digest, StateDigest};
use crate::core::rng::SeededRng;
use crate::game::artifact::DrawRequest;
use crate::game::config::{
    PartyMode, PartyScaling, RunConfig, BASE_DRAIN, BASE_MOMENTUM_CAP, BASE_SANITY, DRAIN_CEILING,
    DRAIN_FLOOR,
};
use crate::game::scene::{HotspotKind, SceneTemplate};
use crate::game::story;

/// Well-known flag keys used by effects and hotspot gating.
pub mod flags {
    /// Scene: absorbs exactly one negative sanity adjustment.
    pub const SAND_WARD: &str = "sand_ward";
    /// Scene: a hint is waiting to be consumed by the next search.
    pub const HINT_AVAILABLE: &str = "hint_available";
    /// Scene: searches in this chamber are pre-guided.
    pub const SEARCH_ASSIST: &str = "search_assist";
    /// Scene: the next gated puzzle resolves itself.
    pub const AUTO_SOLVE: &str = "auto_solve";
    /// Scene: hidden routes are revealed.
    pub const REVEALED_PATHS: &str = "revealed_paths";
    /// Scene: the exit has been primed and `proceed` is allowed.
    pub const EXIT_READY: &str = "exit_ready";
    /// Global: searches everywhere are pre-guided.
    pub const SCAN_ASSIST: &str = "scan_assist";
    /// Global: one barrier this run yields without question.
    pub const FREE_ESCAPE: &str = "free_escape";
}

// =============================================================================
// TEMPORAL FLUX
// =============================================================================

/// The temporal flux state machine driving per-tick pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalState {
    #[default]
    Frozen,
    Calm,
    Active,
    Surge,
}

impl TemporalState {
    /// Momentum delta applied each tick in this state. Negative cools.
    pub fn tick_momentum(self) -> f64 {
        match self {
            TemporalState::Frozen => -crate::game::config::PASSIVE_COOL_RATE,
            TemporalState::Calm => -crate::game::config::CALM_COOL_RATE,
            TemporalState::Active => crate::game::config::ACTIVE_HEAT_RATE,
            TemporalState::Surge => crate::game::config::SURGE_HEAT_RATE,
        }
    }

    /// Sanity drift multiplier. Frozen and calm chambers do not drain.
    pub fn drift_multiplier(self) -> f64 {
        match self {
            TemporalState::Frozen | TemporalState::Calm => 0.0,
            TemporalState::Active => 0.9,
            TemporalState::Surge => 1.35,
        }
    }

    /// Probability of an ambient sanity swing per tick.
    pub fn ambient_chance(self) -> f64 {
        match self {
            TemporalState::Frozen => 0.08,
            TemporalState::Calm => 0.15,
            TemporalState::Active => 0.30,
            TemporalState::Surge => 0.42,
        }
    }

    /// Magnitude scale of ambient swings.
    pub fn ambient_scale(self) -> f64 {
        match self {
            TemporalState::Frozen => 1.5,
            TemporalState::Calm => 2.2,
            TemporalState::Active => 3.0,
            TemporalState::Surge => 4.5,
        }
    }

    /// Chance an ambient swing is negative.
    pub fn ambient_negative_bias(self) -> f64 {
        match self {
            TemporalState::Frozen => 0.50,
            TemporalState::Calm => 0.35,
            TemporalState::Active => 0.65,
            TemporalState::Surge => 0.85,
        }
    }

    /// Single-letter phase marker used in log stamps.
    pub fn initial(self) -> char {
        match self {
            TemporalState::Frozen => 'F',
            TemporalState::Calm => 'C',
            TemporalState::Active => 'A',
            TemporalState::Surge => 'S',
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            TemporalState::Frozen => 0,
            TemporalState::Calm => 1,
            TemporalState::Active => 2,
            TemporalState::Surge => 3,
        }
    }
}

/// Interaction categories that perturb the temporal flux.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    /// A relic was discovered or claimed.
    Relic,
    /// A puzzle was resolved.
    Puzzle,
    /// A dialogue was resolved.
    Dialogue,
    /// An exit was primed.
    Exit,
}

// =============================================================================
// LOG
// =============================================================================

/// Tone of a narrative log line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    System,
    Positive,
    Negative,
    Neutral,
}

/// One narrative log line with its flux-phase stamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub stamp: String,
    pub tone: Tone,
    pub message: String,
}

// =============================================================================
// PLAYERS
// =============================================================================

/// Derived player condition, for HUD display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Steady,
    Stressed,
    Critical,
}

/// One party member. Sanity shares are projections of the run-level
/// sanity, not independently authoritative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub max_sanity: f64,
    pub sanity: f64,
}

impl Player {
    /// Status derived from the share ratio.
    pub fn status(&self) -> PlayerStatus {
        if self.max_sanity <= 0.0 {
            return PlayerStatus::Critical;
        }
        let ratio = self.sanity / self.max_sanity;
        if ratio >= 0.55 {
            PlayerStatus::Steady
        } else if ratio >= 0.25 {
            PlayerStatus::Stressed
        } else {
            PlayerStatus::Critical
        }
    }
}

// =============================================================================
// SCENES
// =============================================================================

/// One candidate action in a relic search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAction {
    pub id: String,
    pub label: String,
    pub description: String,
}

/// Search progress for one artifact hotspot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchProfile {
    pub actions: Vec<SearchAction>,
    pub success_index: usize,
    pub attempts: u32,
    pub hinted: bool,
}

/// Per-instance scene state, created lazily on first visit and retained
/// for the rest of the run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    pub resolved_hotspots: BTreeSet<String>,
    pub puzzles: BTreeMap<String, bool>,
    pub dialogues: BTreeMap<String, String>,
    pub discovered_artifacts: BTreeSet<String>,
    pub search_profiles: BTreeMap<String, SearchProfile>,
    pub flags: BTreeMap<String, bool>,
    pub visited: bool,
}

impl SceneState {
    /// Read a local flag, defaulting to false.
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Write a local flag.
    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    /// Whether a puzzle has been solved in this instance.
    pub fn puzzle_solved(&self, puzzle_id: &str) -> bool {
        self.puzzles.get(puzzle_id).copied().unwrap_or(false)
    }
}

/// One concrete, independently-stateful occurrence of a scene template.
///
/// The same template may recur in a run; each instantiation gets its own
/// key, state, and a fresh artifact roll, so endless traversal never
/// collides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneInstance {
    pub instance_key: String,
    pub template_id: String,
}

/// One owned relic with the chamber it was claimed in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub artifact_id: String,
    pub scene_key: String,
}

/// How a finished run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// All configured rooms cleared.
    Escaped,
    /// Sanity reached zero.
    SanityShattered,
    /// Momentum reached the cap.
    MomentumOverflow,
}

impl RunOutcome {
    /// Whether this outcome counts as a success.
    pub fn is_success(self) -> bool {
        matches!(self, RunOutcome::Escaped)
    }
}

// =============================================================================
// RUN SIMULATION
// =============================================================================

/// Complete state of one run.
///
/// Exactly one writable instance exists per session, owned by the host.
/// Every numeric write clamps at the mutation site; the terminal
/// transition fires exactly once and later mutations no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSimulation {
    pub seed: u32,
    pub mode_key: String,
    pub length_key: String,
    pub party_mode: PartyMode,
    pub scaling: PartyScaling,

    pub sanity: f64,
    pub max_sanity: f64,
    pub drain_rate: f64,
    pub momentum: f64,
    pub momentum_cap: f64,
    pub temporal_state: TemporalState,
    pub event_ticks: u32,
    pub tick_count: u64,

    pub current_scene_index: usize,
    pub cleared_rooms: u32,
    pub run_total: Option<u32>,
    pub scene_queue: Vec<SceneInstance>,
    /// instance key -> hotspot id -> assigned artifact id
    pub scene_assignments: BTreeMap<String, BTreeMap<String, String>>,
    pub scene_states: BTreeMap<String, SceneState>,

    pub inventory: Vec<InventoryEntry>,
    pub inventory_ids: BTreeSet<String>,
    pub flags: BTreeMap<String, bool>,
    pub players: Vec<Player>,

    pub gacha_charges: u32,
    pub combo_intensity: f64,
    pub rarity_bias: [f64; 5],
    pub gacha_rarity_bonus: [f64; 5],

    pub game_over: bool,
    pub outcome: Option<RunOutcome>,
    pub logs: Vec<LogEntry>,

    pub rng: SeededRng,
}

impl RunSimulation {
    /// Construct a fresh run from a resolved configuration.
    ///
    /// All scaling is computed here, once, from the settled roster size.
    /// The scene queue is shuffled and every artifact hotspot receives a
    /// fresh weighted roll through the active generator.
    pub fn new(config: &RunConfig, content: &GameContent) -> Self {
        let scaling = config.scaling();
        let mut rng = SeededRng::new(config.seed);

        let max_sanity = BASE_SANITY * scaling.sanity;
        let drain_rate = (BASE_DRAIN * scaling.drain).clamp(DRAIN_FLOOR, DRAIN_CEILING);
        let momentum_cap = BASE_MOMENTUM_CAP * scaling.momentum_cap;

        // Party rarity scaling compounds per tier so deeper tiers gain
        // progressively more weight; scaling every tier equally would
        // cancel out in normalization.
        let mut rarity_bias = config.mode.rarity_bias;
        for (tier, bias) in rarity_bias.iter_mut().enumerate() {
            *bias *= scaling.rarity_bias.powi(tier as i32);
        }

        // Shuffle the template pool once, then instantiate in order,
        // cycling if the run is longer than the pool.
        let mut pool: Vec<String> = content.scenes.iter().map(|s| s.id.clone()).collect();
        rng.shuffle(&mut pool);

        let planned = match config.length.total_rooms() {
            Some(n) => n as usize,
            None => pool.len().max(1),
        };

        let mut scene_queue = Vec::with_capacity(planned);
        let mut scene_assignments = BTreeMap::new();
        for ordinal in 0..planned {
            let template_id = pool[ordinal % pool.len()].clone();
            let (instance, assignment) = instantiate_scene(
                &mut rng,
                content,
                &template_id,
                ordinal + 1,
                rarity_bias,
            );
            scene_assignments.insert(instance.instance_key.clone(), assignment);
            scene_queue.push(instance);
        }

        let share = max_sanity / config.roster.len() as f64;
        let players = config
            .roster
            .iter()
            .map(|entry| Player {
                id: entry.id.clone(),
                name: entry.name.clone(),
                max_sanity: share,
                sanity: share,
            })
            .collect();

        let gacha_charges = (config.mode.gacha_charges as f64 * scaling.bonus).floor() as u32;

        let mut sim = Self {
            seed: config.seed,
            mode_key: config.mode_key.clone(),
            length_key: config.length_key.clone(),
            party_mode: config.party_mode,
            scaling,
            sanity: max_sanity,
            max_sanity,
            drain_rate,
            momentum: 0.0,
            momentum_cap,
            temporal_state: TemporalState::Frozen,
            event_ticks: 0,
            tick_count: 0,
            current_scene_index: 0,
            cleared_rooms: 0,
            run_total: config.length.total_rooms(),
            scene_queue,
            scene_assignments,
            scene_states: BTreeMap::new(),
            inventory: Vec::new(),
            inventory_ids: BTreeSet::new(),
            flags: BTreeMap::new(),
            players,
            gacha_charges,
            combo_intensity: config.mode.combo_intensity * scaling.bonus,
            rarity_bias,
            gacha_rarity_bonus: config.mode.gacha_rarity_bonus,
            game_over: false,
            outcome: None,
            logs: Vec::new(),
            rng,
        };

        sim.log(
            Tone::System,
            "The hourglass seals around you. Find the artifacts and escape.",
        );
        let opening = story::opening_line(sim.seed);
        sim.log(Tone::System, &opening);
        sim.visit_current_scene(content);

        sim
    }

    // =========================================================================
    // Scene access
    // =========================================================================

    /// The scene instance the party currently occupies.
    pub fn current_instance(&self) -> Option<&SceneInstance> {
        self.scene_queue.get(self.current_scene_index)
    }

    /// The current instance key, if any scene remains.
    pub fn current_scene_key(&self) -> Option<String> {
        self.current_instance().map(|i| i.instance_key.clone())
    }

    /// Scene state for an instance key, created lazily on first touch.
    pub fn scene_state_mut(&mut self, instance_key: &str) -> &mut SceneState {
        self.scene_states
            .entry(instance_key.to_string())
            .or_default()
    }

    /// Read-only scene state, if the instance has been touched.
    pub fn scene_state(&self, instance_key: &str) -> Option<&SceneState> {
        self.scene_states.get(instance_key)
    }

    /// Artifact assigned to a hotspot of an instance.
    pub fn assigned_artifact(&self, instance_key: &str, hotspot_id: &str) -> Option<&str> {
        self.scene_assignments
            .get(instance_key)
            .and_then(|m| m.get(hotspot_id))
            .map(String::as_str)
    }

    /// Mark the current scene visited, logging its intro on first entry.
    pub fn visit_current_scene(&mut self, content: &GameContent) {
        let Some(instance) = self.current_instance().cloned() else {
            return;
        };
        let state = self.scene_state_mut(&instance.instance_key);
        if state.visited {
            return;
        }
        state.visited = true;

        let name = content
            .scene(&instance.template_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| instance.template_id.clone());
        let intro = story::scene_intro(self.seed, &instance.instance_key, &name);
        self.log(Tone::System, &intro);
    }

    /// Append one more instance to the queue (endless runs only).
    pub fn extend_queue(&mut self, content: &GameContent) {
        let Some(template) = self
            .rng
            .choose(&content.scenes)
            .map(|s: &SceneTemplate| s.id.clone())
        else {
            return;
        };
        let ordinal = self.scene_queue.len() + 1;
        let bias = self.rarity_bias;
        let (instance, assignment) =
            instantiate_scene(&mut self.rng, content, &template, ordinal, bias);
        self.scene_assignments
            .insert(instance.instance_key.clone(), assignment);
        self.scene_queue.push(instance);
    }

    // =========================================================================
    // Resource mutation - clamp, don't throw
    // =========================================================================

    /// Adjust sanity, clamped to [0, max]. A negative adjustment may be
    /// absorbed by the active scene's ward, consuming the ward instead.
    /// Reaching zero is a one-shot terminal transition.
    pub fn adjust_sanity(&mut self, amount: f64, message: Option<&str>) {
        if self.game_over {
            return;
        }
        if amount < 0.0 && self.consume_ward() {
            self.log(Tone::Positive, "The sand ward absorbs the mental backlash.");
            return;
        }
        self.sanity = (self.sanity + amount).clamp(0.0, self.max_sanity);
        self.sync_player_shares();
        if let Some(msg) = message {
            let tone = if amount >= 0.0 {
                Tone::Positive
            } else {
                Tone::Negative
            };
            self.log(tone, msg);
        }
        if self.sanity <= 0.0 {
            self.end_run(
                RunOutcome::SanityShattered,
                "Your sanity shatters. The hourglass closes.",
            );
        }
    }

    /// Heat momentum, clamped to the cap. Reaching the cap is a one-shot
    /// terminal transition; further heat calls no-op.
    pub fn heat_momentum(&mut self, amount: f64) {
        if amount <= 0.0 || self.game_over {
            return;
        }
        self.momentum = (self.momentum + amount).min(self.momentum_cap);
        if self.momentum >= self.momentum_cap {
            self.end_run(
                RunOutcome::MomentumOverflow,
                "A temporal surge overwhelms you. The hourglass floods in a single breath.",
            );
        }
    }

    /// Cool momentum, clamped at zero.
    pub fn cool_momentum(&mut self, amount: f64) {
        if amount <= 0.0 || self.game_over {
            return;
        }
        self.momentum = (self.momentum - amount).max(0.0);
    }

    /// Shift the drain rate, clamped to the effect's bounds.
    pub fn adjust_drain(&mut self, amount: f64, floor: f64, ceiling: f64) {
        if self.game_over {
            return;
        }
        self.drain_rate = (self.drain_rate + amount).clamp(floor, ceiling);
    }

    fn consume_ward(&mut self) -> bool {
        let Some(key) = self.current_scene_key() else {
            return false;
        };
        let state = self.scene_state_mut(&key);
        if state.flag(flags::SAND_WARD) {
            state.set_flag(flags::SAND_WARD, false);
            true
        } else {
            false
        }
    }

    fn sync_player_shares(&mut self) {
        let count = self.players.len().max(1) as f64;
        let share = self.sanity / count;
        let max_share = self.max_sanity / count;
        for player in &mut self.players {
            player.sanity = share;
            player.max_sanity = max_share;
        }
    }

    // =========================================================================
    // Temporal flux transitions
    // =========================================================================

    /// Kick the flux into an excited state (active or surge). The event
    /// window only ever widens; an optional momentum bump applies on top.
    pub fn trigger_temporal_event(&mut self, state: TemporalState, ticks: u32, bump: f64) {
        if self.game_over {
            return;
        }
        let state = match state {
            TemporalState::Surge => TemporalState::Surge,
            _ => TemporalState::Active,
        };
        self.temporal_state = state;
        self.event_ticks = self.event_ticks.max(ticks.max(1));
        if bump > 0.0 {
            self.heat_momentum(bump);
        }
    }

    /// Settle the flux toward stillness (calm with a short window, or
    /// fully frozen).
    pub fn settle_temporal_flow(&mut self, state: TemporalState, ticks: u32) {
        if self.game_over {
            return;
        }
        if state == TemporalState::Calm {
            self.temporal_state = TemporalState::Calm;
            self.event_ticks = ticks.max(1);
        } else {
            self.temporal_state = TemporalState::Frozen;
            self.event_ticks = 0;
        }
    }

    /// Route a player interaction into the flux state machine.
    pub fn mark_interaction(&mut self, kind: InteractionKind) {
        match kind {
            InteractionKind::Relic => self.trigger_temporal_event(TemporalState::Active, 4, 0.0),
            InteractionKind::Puzzle => self.trigger_temporal_event(TemporalState::Surge, 5, 3.0),
            InteractionKind::Dialogue => self.trigger_temporal_event(TemporalState::Active, 3, 0.0),
            InteractionKind::Exit => self.settle_temporal_flow(TemporalState::Calm, 3),
        }
    }

    // =========================================================================
    // Terminal transitions
    // =========================================================================

    /// End the run in failure or success. Fires exactly once; the flux
    /// freezes and every later mutation attempt is a no-op.
    pub fn end_run(&mut self, outcome: RunOutcome, message: &str) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.outcome = Some(outcome);
        self.temporal_state = TemporalState::Frozen;
        self.event_ticks = 0;
        let tone = if outcome.is_success() {
            Tone::Positive
        } else {
            Tone::Negative
        };
        self.log(tone, message);
    }

    /// End the run in success after clearing the configured room count.
    pub fn complete_run(&mut self) {
        self.end_run(
            RunOutcome::Escaped,
            "You emerge from the hourglass, artifacts humming with untapped potential.",
        );
    }

    // =========================================================================
    // Inventory & log
    // =========================================================================

    /// Record an owned relic with its provenance.
    pub fn push_inventory(&mut self, artifact_id: &str, scene_key: &str) {
        self.inventory.push(InventoryEntry {
            artifact_id: artifact_id.to_string(),
            scene_key: scene_key.to_string(),
        });
        self.inventory_ids.insert(artifact_id.to_string());
    }

    /// Whether an artifact is owned.
    pub fn owns(&self, artifact_id: &str) -> bool {
        self.inventory_ids.contains(artifact_id)
    }

    /// Read a global flag, defaulting to false.
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Write a global flag.
    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    /// Append a narrative log line stamped with the current flux phase.
    pub fn log(&mut self, tone: Tone, message: &str) {
        let stamp = format!(
            "T{}+{:03}",
            self.temporal_state.initial(),
            self.tick_count
        );
        self.logs.push(LogEntry {
            stamp,
            tone,
            message: message.to_string(),
        });
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Digest of the gameplay-relevant state, for replay validation and
    /// replication fidelity checks.
    pub fn state_digest(&self) -> StateDigest {
        compute_state_digest(self.tick_count, self.seed, |hasher| {
            hasher.update_f64(self.sanity);
            hasher.update_f64(self.drain_rate);
            hasher.update_f64(self.momentum);
            hasher.update_u8(self.temporal_state.as_u8());
            hasher.update_u32(self.event_ticks);
            hasher.update_u64(self.current_scene_index as u64);
            hasher.update_u32(self.cleared_rooms);
            hasher.update_bool(self.game_over);
            hasher.update_u32(self.gacha_charges);

            for entry in &self.inventory {
                hasher.update_str(&entry.artifact_id);
            }
            for (key, value) in &self.flags {
                hasher.update_str(key);
                hasher.update_bool(*value);
            }
            for (key, state) in &self.scene_states {
                hasher.update_str(key);
                hasher.update_bool(state.visited);
                for hotspot in &state.resolved_hotspots {
                    hasher.update_str(hotspot);
                }
                for (puzzle, solved) in &state.puzzles {
                    hasher.update_str(puzzle);
                    hasher.update_bool(*solved);
                }
                for (dialogue, choice) in &state.dialogues {
                    hasher.update_str(dialogue);
                    hasher.update_str(choice);
                }
                for (flag, value) in &state.flags {
                    hasher.update_str(flag);
                    hasher.update_bool(*value);
                }
            }
        })
    }
}

/// Instantiate a scene template: mint the instance key and roll fresh
/// artifacts for every artifact hotspot.
fn instantiate_scene(
    rng: &mut SeededRng,
    content: &GameContent,
    template_id: &str,
    ordinal: usize,
    rarity_bias: [f64; 5],
) -> (SceneInstance, BTreeMap<String, String>) {
    let instance = SceneInstance {
        instance_key: format!("{template_id}#{ordinal}"),
        template_id: template_id.to_string(),
    };

    let mut assignment = BTreeMap::new();
    let owned = BTreeSet::new();
    if let Some(template) = content.scene(template_id) {
        for hotspot in &template.hotspots {
            if let HotspotKind::Artifact { pool } = &hotspot.kind {
                let request = DrawRequest {
                    bias: rarity_bias,
                    rarity: None,
                    pool: Some(pool),
                    owned: &owned,
                    gacha_bonus: None,
                };
                if let Some(artifact) = content.catalog.weighted_draw(rng, &request) {
                    assignment.insert(hotspot.id.clone(), artifact.id.clone());
                }
            }
        }
    }

    (instance, assignment)
}

// =============================================================================
// TESTS
// =============================================================================
