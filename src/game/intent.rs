//! Player Intents
//!
//! The single entry point through which the host mutates a run. Intents
//! arrive from the presentation layer (or a replay script), are gated
//! against scene state, and route through the effect resolver.
//!
//! Clients never reach this module: their mirrors expose no mutating
//! surface at all.

use serde::{Deserialize, Serialize};

use crate::content::GameContent;
use crate::game::artifact::DrawRequest;
use crate::game::effect::resolve_effects;
use crate::game::scene::{HotspotKind, PuzzleOutcome, Requirements, SceneTemplate};
use crate::game::state::{
    flags, InteractionKind, RunSimulation, SceneInstance, SearchAction, SearchProfile,
    TemporalState, Tone,
};
use crate::game::story;

/// A player intent. Only the session host accepts these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Touch a hotspot: claim a relic, or prime an exit. Touching a
    /// puzzle or dialogue hotspot asks for a choice instead.
    ClaimHotspot { hotspot_id: String },
    /// Answer an open relic search with one of its candidate actions.
    SearchAction {
        hotspot_id: String,
        action_index: usize,
    },
    /// Resolve a puzzle with a specific option.
    ChoosePuzzleOption {
        hotspot_id: String,
        option_id: String,
    },
    /// Resolve a dialogue with a specific choice.
    ChooseDialogueOption {
        hotspot_id: String,
        choice_id: String,
    },
    /// Spend one gacha charge on a bonus draw.
    RollGacha,
    /// Leave through a primed exit.
    Proceed,
}

/// What an intent did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    /// State advanced; re-render from the simulation.
    Applied,
    /// Nothing changed beyond, at most, a log line (already resolved,
    /// gated, or the run is over).
    Ignored,
    /// An artifact hotspot opened a search; pick one of these actions.
    AwaitingSearch(Vec<SearchAction>),
    /// A puzzle or dialogue hotspot needs a choice from its template.
    AwaitingChoice { hotspot_id: String },
}

/// Intent routing failures. These indicate a confused caller (bad ids),
/// not a rule the player ran into.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    #[error("no active scene")]
    NoActiveScene,

    #[error("scene template {0} missing from content")]
    UnknownTemplate(String),

    #[error("unknown hotspot {0}")]
    UnknownHotspot(String),

    #[error("hotspot {hotspot} is not a {expected}")]
    WrongHotspotKind {
        hotspot: String,
        expected: &'static str,
    },

    #[error("hotspot {hotspot} has no option {option}")]
    UnknownOption { hotspot: String, option: String },

    #[error("no search in progress at {0}")]
    NoSearchInProgress(String),

    #[error("search action index {index} out of range at {hotspot}")]
    InvalidSearchAction { hotspot: String, index: usize },
}

/// Apply one intent against the simulation.
///
/// After the terminal transition every intent is ignored; the session
/// stays intact until the player explicitly restarts or leaves.
pub fn apply_intent(
    sim: &mut RunSimulation,
    content: &GameContent,
    intent: &Intent,
) -> Result<IntentOutcome, IntentError> {
    if sim.game_over {
        return Ok(IntentOutcome::Ignored);
    }

    match intent {
        Intent::ClaimHotspot { hotspot_id } => claim_hotspot(sim, content, hotspot_id),
        Intent::SearchAction {
            hotspot_id,
            action_index,
        } => search_action(sim, content, hotspot_id, *action_index),
        Intent::ChoosePuzzleOption {
            hotspot_id,
            option_id,
        } => choose_puzzle_option(sim, content, hotspot_id, option_id),
        Intent::ChooseDialogueOption {
            hotspot_id,
            choice_id,
        } => choose_dialogue_option(sim, content, hotspot_id, choice_id),
        Intent::RollGacha => roll_gacha(sim, content),
        Intent::Proceed => proceed(sim, content),
    }
}

/// Resolve the current instance and its template.
fn current_scene<'c>(
    sim: &RunSimulation,
    content: &'c GameContent,
) -> Result<(SceneInstance, &'c SceneTemplate), IntentError> {
    let instance = sim
        .current_instance()
        .cloned()
        .ok_or(IntentError::NoActiveScene)?;
    let template = content
        .scene(&instance.template_id)
        .ok_or_else(|| IntentError::UnknownTemplate(instance.template_id.clone()))?;
    Ok((instance, template))
}

fn claim_hotspot(
    sim: &mut RunSimulation,
    content: &GameContent,
    hotspot_id: &str,
) -> Result<IntentOutcome, IntentError> {
    let (instance, template) = current_scene(sim, content)?;
    let hotspot = template
        .hotspot(hotspot_id)
        .ok_or_else(|| IntentError::UnknownHotspot(hotspot_id.to_string()))?;
    let key = instance.instance_key.clone();

    if sim
        .scene_state(&key)
        .is_some_and(|s| s.resolved_hotspots.contains(hotspot_id))
    {
        sim.log(Tone::System, "Nothing more to do here.");
        return Ok(IntentOutcome::Ignored);
    }

    match &hotspot.kind {
        HotspotKind::Artifact { .. } => {
            let discovered = sim
                .scene_state(&key)
                .is_some_and(|s| s.discovered_artifacts.contains(hotspot_id));
            if discovered {
                claim_artifact(sim, content, &key, hotspot_id);
                Ok(IntentOutcome::Applied)
            } else {
                sim.mark_interaction(InteractionKind::Relic);
                let actions = open_search(sim, content, &key, hotspot_id);
                Ok(IntentOutcome::AwaitingSearch(actions))
            }
        }
        HotspotKind::Exit {
            requires,
            success_text,
        } => attempt_exit(sim, content, &key, hotspot_id, requires, success_text),
        HotspotKind::Puzzle(_) | HotspotKind::Dialogue(_) => Ok(IntentOutcome::AwaitingChoice {
            hotspot_id: hotspot_id.to_string(),
        }),
    }
}

/// Build (or refresh hints on) the search profile and hand back its
/// candidate actions.
fn open_search(
    sim: &mut RunSimulation,
    content: &GameContent,
    instance_key: &str,
    hotspot_id: &str,
) -> Vec<SearchAction> {
    // Wording comes from a derived stream; the success index is the
    // gameplay-affecting part and flows through the active generator.
    if sim
        .scene_state(instance_key)
        .map_or(true, |s| !s.search_profiles.contains_key(hotspot_id))
    {
        let actions = story::search_actions(sim.seed, instance_key, hotspot_id);
        let success_index = sim.rng.next_index(actions.len());
        sim.scene_state_mut(instance_key).search_profiles.insert(
            hotspot_id.to_string(),
            SearchProfile {
                actions,
                success_index,
                attempts: 0,
                hinted: false,
            },
        );

        if let Some(name) = assigned_artifact_name(sim, content, instance_key, hotspot_id) {
            let clue = story::search_clue(&name);
            sim.log(Tone::System, &clue);
        }
    }

    apply_search_hints(sim, instance_key, hotspot_id);

    sim.scene_state(instance_key)
        .and_then(|s| s.search_profiles.get(hotspot_id))
        .map(|p| p.actions.clone())
        .unwrap_or_default()
}

fn assigned_artifact_name(
    sim: &RunSimulation,
    content: &GameContent,
    instance_key: &str,
    hotspot_id: &str,
) -> Option<String> {
    sim.assigned_artifact(instance_key, hotspot_id)
        .and_then(|id| content.catalog.get(id))
        .map(|a| a.name.clone())
}

/// An available hint (scene hint, scene search assist, or global scan
/// assist) marks the correct action once; a consumable scene hint is
/// spent doing so.
fn apply_search_hints(sim: &mut RunSimulation, instance_key: &str, hotspot_id: &str) {
    let global_assist = sim.flag(flags::SCAN_ASSIST);
    let state = sim.scene_state_mut(instance_key);
    let scene_hint = state.flag(flags::HINT_AVAILABLE);
    let hint_active = scene_hint || global_assist || state.flag(flags::SEARCH_ASSIST);
    if !hint_active {
        return;
    }

    let Some(profile) = state.search_profiles.get_mut(hotspot_id) else {
        return;
    };
    if profile.hinted {
        return;
    }
    profile.hinted = true;
    let index = profile.success_index;
    profile.actions[index].description += " The prior hint vibrates toward this method.";

    if scene_hint {
        state.set_flag(flags::HINT_AVAILABLE, false);
    }
}

fn search_action(
    sim: &mut RunSimulation,
    content: &GameContent,
    hotspot_id: &str,
    action_index: usize,
) -> Result<IntentOutcome, IntentError> {
    let (instance, template) = current_scene(sim, content)?;
    let hotspot = template
        .hotspot(hotspot_id)
        .ok_or_else(|| IntentError::UnknownHotspot(hotspot_id.to_string()))?;
    if !matches!(hotspot.kind, HotspotKind::Artifact { .. }) {
        return Err(IntentError::WrongHotspotKind {
            hotspot: hotspot_id.to_string(),
            expected: "relic",
        });
    }
    let key = instance.instance_key.clone();

    let (success, attempts) = {
        let state = sim.scene_state_mut(&key);
        let profile = state
            .search_profiles
            .get_mut(hotspot_id)
            .ok_or_else(|| IntentError::NoSearchInProgress(hotspot_id.to_string()))?;
        if action_index >= profile.actions.len() {
            return Err(IntentError::InvalidSearchAction {
                hotspot: hotspot_id.to_string(),
                index: action_index,
            });
        }
        profile.attempts += 1;
        (action_index == profile.success_index, profile.attempts)
    };

    if success {
        sim.scene_state_mut(&key)
            .discovered_artifacts
            .insert(hotspot_id.to_string());
        if let Some(name) = assigned_artifact_name(sim, content, &key, hotspot_id) {
            let line = story::search_success_line(sim.seed, &key, &name);
            sim.log(Tone::Positive, &line);
        }
        let bonus = (3.0 + sim.rng.next_f64() * 2.0) * sim.scaling.bonus;
        sim.cool_momentum(bonus);
        claim_artifact(sim, content, &key, hotspot_id);
        return Ok(IntentOutcome::Applied);
    }

    let line = story::search_failure_line(sim.seed, &key, attempts);
    sim.log(Tone::Negative, &line);
    sim.heat_momentum(2.0);
    sim.adjust_sanity(-3.0, None);

    // After two botched sweeps the sands betray the right motion.
    let state = sim.scene_state_mut(&key);
    if attempts >= 2 && !state.flag(flags::HINT_AVAILABLE) {
        if let Some(profile) = state.search_profiles.get_mut(hotspot_id) {
            if !profile.hinted {
                let index = profile.success_index;
                profile.actions[index].description += " The sands linger near this motion.";
            }
        }
    }

    Ok(IntentOutcome::Applied)
}

/// Claim a discovered relic: flux bump, inventory, then its effects.
fn claim_artifact(
    sim: &mut RunSimulation,
    content: &GameContent,
    instance_key: &str,
    hotspot_id: &str,
) {
    let Some(artifact_id) = sim
        .assigned_artifact(instance_key, hotspot_id)
        .map(str::to_string)
    else {
        return;
    };
    let Some(artifact) = content.catalog.get(&artifact_id).cloned() else {
        return;
    };

    sim.mark_interaction(InteractionKind::Relic);
    sim.scene_state_mut(instance_key)
        .resolved_hotspots
        .insert(hotspot_id.to_string());
    sim.push_inventory(&artifact.id, instance_key);

    resolve_effects(sim, instance_key, &content.catalog, &artifact.effects);
    sim.log(Tone::System, &format!("{} claimed.", artifact.name));
}

fn choose_puzzle_option(
    sim: &mut RunSimulation,
    content: &GameContent,
    hotspot_id: &str,
    option_id: &str,
) -> Result<IntentOutcome, IntentError> {
    let (instance, template) = current_scene(sim, content)?;
    let hotspot = template
        .hotspot(hotspot_id)
        .ok_or_else(|| IntentError::UnknownHotspot(hotspot_id.to_string()))?;
    let HotspotKind::Puzzle(puzzle) = &hotspot.kind else {
        return Err(IntentError::WrongHotspotKind {
            hotspot: hotspot_id.to_string(),
            expected: "puzzle",
        });
    };
    let key = instance.instance_key.clone();

    if sim
        .scene_state(&key)
        .is_some_and(|s| s.puzzle_solved(&puzzle.id))
    {
        sim.log(Tone::System, "That mechanism is already stabilized.");
        return Ok(IntentOutcome::Ignored);
    }

    if !meets_requirements(sim, content, &key, hotspot_id, &puzzle.requires) {
        return Ok(IntentOutcome::Ignored);
    }

    sim.mark_interaction(InteractionKind::Puzzle);

    if consume_auto_solve(sim, &key) {
        let state = sim.scene_state_mut(&key);
        state.puzzles.insert(puzzle.id.clone(), true);
        state.resolved_hotspots.insert(hotspot_id.to_string());
        sim.log(
            Tone::Positive,
            "Insight floods in-- the puzzle resolves itself.",
        );
        return Ok(IntentOutcome::Applied);
    }

    let option = puzzle
        .option(option_id)
        .ok_or_else(|| IntentError::UnknownOption {
            hotspot: hotspot_id.to_string(),
            option: option_id.to_string(),
        })?
        .clone();

    resolve_effects(sim, &key, &content.catalog, &option.effects);

    if option.outcome == PuzzleOutcome::Success {
        let state = sim.scene_state_mut(&key);
        state.puzzles.insert(puzzle.id.clone(), true);
        state.resolved_hotspots.insert(hotspot_id.to_string());
    }

    Ok(IntentOutcome::Applied)
}

/// A stored auto-solve insight, or the global free-escape vow, resolves
/// a gated mechanism outright. Both are one-shot.
fn consume_auto_solve(sim: &mut RunSimulation, instance_key: &str) -> bool {
    let state = sim.scene_state_mut(instance_key);
    if state.flag(flags::AUTO_SOLVE) {
        state.set_flag(flags::AUTO_SOLVE, false);
        return true;
    }
    if sim.flag(flags::FREE_ESCAPE) {
        sim.set_flag(flags::FREE_ESCAPE, false);
        return true;
    }
    false
}

fn choose_dialogue_option(
    sim: &mut RunSimulation,
    content: &GameContent,
    hotspot_id: &str,
    choice_id: &str,
) -> Result<IntentOutcome, IntentError> {
    let (instance, template) = current_scene(sim, content)?;
    let hotspot = template
        .hotspot(hotspot_id)
        .ok_or_else(|| IntentError::UnknownHotspot(hotspot_id.to_string()))?;
    let HotspotKind::Dialogue(dialogue) = &hotspot.kind else {
        return Err(IntentError::WrongHotspotKind {
            hotspot: hotspot_id.to_string(),
            expected: "dialogue",
        });
    };
    let key = instance.instance_key.clone();

    if sim
        .scene_state(&key)
        .is_some_and(|s| s.dialogues.contains_key(&dialogue.id))
    {
        sim.log(Tone::System, "The echo has already spoken.");
        return Ok(IntentOutcome::Ignored);
    }

    let choice = dialogue
        .choice(choice_id)
        .ok_or_else(|| IntentError::UnknownOption {
            hotspot: hotspot_id.to_string(),
            option: choice_id.to_string(),
        })?
        .clone();

    sim.mark_interaction(InteractionKind::Dialogue);
    resolve_effects(sim, &key, &content.catalog, &choice.effects);
    sim.log(Tone::System, &choice.log);

    let state = sim.scene_state_mut(&key);
    state.dialogues.insert(dialogue.id.clone(), choice.id.clone());
    state.resolved_hotspots.insert(hotspot_id.to_string());

    Ok(IntentOutcome::Applied)
}

fn attempt_exit(
    sim: &mut RunSimulation,
    content: &GameContent,
    instance_key: &str,
    hotspot_id: &str,
    requires: &Requirements,
    success_text: &str,
) -> Result<IntentOutcome, IntentError> {
    if sim
        .scene_state(instance_key)
        .is_some_and(|s| s.flag(flags::EXIT_READY))
    {
        sim.log(Tone::System, "The path already stands open.");
        return Ok(IntentOutcome::Ignored);
    }

    let mut allowed = meets_requirements(sim, content, instance_key, hotspot_id, requires);
    if !allowed && sim.flag(flags::FREE_ESCAPE) {
        sim.set_flag(flags::FREE_ESCAPE, false);
        sim.log(
            Tone::Positive,
            "An old vow answers; the barrier yields without question.",
        );
        allowed = true;
    }
    if !allowed {
        return Ok(IntentOutcome::Ignored);
    }

    let state = sim.scene_state_mut(instance_key);
    state.resolved_hotspots.insert(hotspot_id.to_string());
    state.set_flag(flags::EXIT_READY, true);
    sim.mark_interaction(InteractionKind::Exit);
    sim.log(Tone::Positive, success_text);

    Ok(IntentOutcome::Applied)
}

/// Check a hotspot's demands, letting a designated fallback artifact in
/// inventory override them (logged once per hotspot).
fn meets_requirements(
    sim: &mut RunSimulation,
    content: &GameContent,
    instance_key: &str,
    hotspot_id: &str,
    requires: &Requirements,
) -> bool {
    if requires.is_empty() {
        return true;
    }

    let fallback_owned = requires
        .fallback_artifact
        .as_deref()
        .is_some_and(|id| sim.owns(id));

    if !requires.puzzles.is_empty() {
        let missing = requires.puzzles.iter().any(|p| {
            !sim.scene_state(instance_key)
                .is_some_and(|s| s.puzzle_solved(p))
        });
        if missing
            && !try_fallback(
                sim,
                content,
                instance_key,
                hotspot_id,
                requires,
                fallback_owned,
                "Mechanisms remain unsolved.",
            )
        {
            return false;
        }
    }

    if !requires.artifacts_any.is_empty() {
        let has_any = requires.artifacts_any.iter().any(|id| sim.owns(id));
        if !has_any
            && !try_fallback(
                sim,
                content,
                instance_key,
                hotspot_id,
                requires,
                fallback_owned,
                "You need a suitable artifact.",
            )
        {
            return false;
        }
    }

    if let Some(flag) = &requires.hint_flag {
        let set = sim.scene_state(instance_key).is_some_and(|s| s.flag(flag));
        if !set
            && !try_fallback(
                sim,
                content,
                instance_key,
                hotspot_id,
                requires,
                fallback_owned,
                "You lack the insight to attempt this yet.",
            )
        {
            return false;
        }
    }

    if !requires.artifacts_all.is_empty() {
        let missing_all = requires.artifacts_all.iter().any(|id| !sim.owns(id));
        if missing_all
            && !try_fallback(
                sim,
                content,
                instance_key,
                hotspot_id,
                requires,
                fallback_owned,
                "Additional artifacts are required.",
            )
        {
            return false;
        }
    }

    true
}

fn try_fallback(
    sim: &mut RunSimulation,
    content: &GameContent,
    instance_key: &str,
    hotspot_id: &str,
    requires: &Requirements,
    fallback_owned: bool,
    message: &str,
) -> bool {
    if !fallback_owned {
        sim.log(Tone::System, message);
        return false;
    }

    let fallback_key = format!("fallback-{hotspot_id}");
    let already = sim
        .scene_state(instance_key)
        .is_some_and(|s| s.flag(&fallback_key));
    if !already {
        let name = requires
            .fallback_artifact
            .as_deref()
            .and_then(|id| content.catalog.get(id))
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "The relic".to_string());
        sim.log(
            Tone::Positive,
            &format!("{name} resonates, overriding the chamber's demand."),
        );
        sim.scene_state_mut(instance_key).set_flag(&fallback_key, true);
    }
    true
}

fn roll_gacha(
    sim: &mut RunSimulation,
    content: &GameContent,
) -> Result<IntentOutcome, IntentError> {
    if sim.gacha_charges == 0 {
        sim.log(Tone::System, "The gacha drum is spent.");
        return Ok(IntentOutcome::Ignored);
    }
    let key = sim.current_scene_key().ok_or(IntentError::NoActiveScene)?;
    sim.gacha_charges -= 1;

    let drawn = {
        let request = DrawRequest {
            bias: sim.rarity_bias,
            rarity: None,
            pool: None,
            owned: &sim.inventory_ids,
            gacha_bonus: Some(&sim.gacha_rarity_bonus),
        };
        content.catalog.weighted_draw(&mut sim.rng, &request).cloned()
    };

    let Some(artifact) = drawn else {
        return Ok(IntentOutcome::Ignored);
    };

    sim.mark_interaction(InteractionKind::Relic);
    sim.log(
        Tone::System,
        &format!("The drum rattles and yields {}.", artifact.name),
    );
    sim.push_inventory(&artifact.id, &key);
    resolve_effects(sim, &key, &content.catalog, &artifact.effects);
    sim.log(Tone::System, &format!("{} claimed.", artifact.name));

    Ok(IntentOutcome::Applied)
}

fn proceed(
    sim: &mut RunSimulation,
    content: &GameContent,
) -> Result<IntentOutcome, IntentError> {
    let key = sim.current_scene_key().ok_or(IntentError::NoActiveScene)?;

    if !sim
        .scene_state(&key)
        .is_some_and(|s| s.flag(flags::EXIT_READY))
    {
        sim.log(Tone::System, "The exit resists-- resolve the chamber first.");
        return Ok(IntentOutcome::Ignored);
    }

    sim.cleared_rooms += 1;

    if let Some(total) = sim.run_total {
        if sim.cleared_rooms >= total {
            sim.complete_run();
            return Ok(IntentOutcome::Applied);
        }
    }

    sim.current_scene_index += 1;
    if sim.current_scene_index >= sim.scene_queue.len() {
        // Endless descent: mint the next chamber on demand.
        sim.extend_queue(content);
    }

    sim.log(Tone::System, "You descend deeper into the hourglass.");
    sim.settle_temporal_flow(TemporalState::Frozen, 0);
    sim.visit_current_scene(content);

    Ok(IntentOutcome::Applied)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::GameContent;
    use crate::game::config::{ModeConfig, PartyMode, RosterEntry, RunConfig, RunLength};
    use crate::game::state::RunOutcome;
    use crate::game::tick::tick;

    fn normal_mode() -> ModeConfig {
        ModeConfig {
            label: "Normal".to_string(),
            rarity_bias: [1.0; 5],
            gacha_rarity_bonus: [0.6, 0.9, 1.4, 2.2, 3.0],
            gacha_charges: 2,
            combo_intensity: 1.5,
        }
    }

    fn config(seed: u32, length: RunLength) -> RunConfig {
        RunConfig {
            seed,
            mode_key: "normal".to_string(),
            length_key: "brief".to_string(),
            mode: normal_mode(),
            length,
            roster: vec![RosterEntry {
                id: "p1".to_string(),
                name: "Echo Runner".to_string(),
            }],
            party_mode: PartyMode::Solo,
        }
    }

    fn new_run(seed: u32, rooms: u32) -> (RunSimulation, GameContent) {
        let content = GameContent::from_fallback();
        let sim = RunSimulation::new(&config(seed, RunLength::Rooms(rooms)), &content);
        (sim, content)
    }

    fn find_hotspot<'a>(
        sim: &RunSimulation,
        content: &'a GameContent,
        pred: impl Fn(&HotspotKind) -> bool,
    ) -> &'a crate::game::scene::Hotspot {
        let instance = sim.current_instance().unwrap();
        let template = content.scene(&instance.template_id).unwrap();
        template
            .hotspots
            .iter()
            .find(|h| pred(&h.kind))
            .expect("hotspot kind present in every chamber")
    }

    /// Claim the chamber's relic via its search, solve its puzzle with
    /// the success option, prime the exit, and proceed.
    fn clear_current_room(sim: &mut RunSimulation, content: &GameContent) {
        // Relic: open the search, then answer with the rolled success
        // index (the presentation would read it off the profile too).
        let artifact_id = find_hotspot(sim, content, |k| {
            matches!(k, HotspotKind::Artifact { .. })
        })
        .id
        .clone();
        let outcome = apply_intent(
            sim,
            content,
            &Intent::ClaimHotspot {
                hotspot_id: artifact_id.clone(),
            },
        )
        .unwrap();
        assert!(matches!(outcome, IntentOutcome::AwaitingSearch(_)));

        let key = sim.current_scene_key().unwrap();
        let success_index = sim.scene_state(&key).unwrap().search_profiles[&artifact_id]
            .success_index;
        apply_intent(
            sim,
            content,
            &Intent::SearchAction {
                hotspot_id: artifact_id.clone(),
                action_index: success_index,
            },
        )
        .unwrap();
        assert!(sim.owns(sim.inventory.last().unwrap().artifact_id.as_str()));

        // Puzzle: choose the success option.
        let puzzle_hotspot =
            find_hotspot(sim, content, |k| matches!(k, HotspotKind::Puzzle(_))).clone();
        let HotspotKind::Puzzle(puzzle) = &puzzle_hotspot.kind else {
            unreachable!();
        };
        let momentum_before = sim.momentum;
        let success_option = puzzle
            .options
            .iter()
            .find(|o| o.outcome == PuzzleOutcome::Success)
            .unwrap();
        apply_intent(
            sim,
            content,
            &Intent::ChoosePuzzleOption {
                hotspot_id: puzzle_hotspot.id.clone(),
                option_id: success_option.id.clone(),
            },
        )
        .unwrap();
        assert_eq!(sim.temporal_state, TemporalState::Surge);
        assert!(sim.momentum >= momentum_before, "puzzle bumps momentum");

        // Exit, then proceed.
        let exit_id = find_hotspot(sim, content, |k| matches!(k, HotspotKind::Exit { .. }))
            .id
            .clone();
        apply_intent(
            sim,
            content,
            &Intent::ClaimHotspot {
                hotspot_id: exit_id,
            },
        )
        .unwrap();
        assert_eq!(sim.temporal_state, TemporalState::Calm);

        apply_intent(sim, content, &Intent::Proceed).unwrap();
    }

    #[test]
    fn test_three_room_run_ends_in_success() {
        // seed 42, three chambers: relic, puzzle, exit, proceed per room
        // ends the run in success, not failure.
        let (mut sim, content) = new_run(42, 3);

        for _ in 0..3 {
            tick(&mut sim);
            clear_current_room(&mut sim, &content);
        }

        assert!(sim.game_over);
        assert_eq!(sim.outcome, Some(RunOutcome::Escaped));
        assert_eq!(sim.cleared_rooms, 3);
    }

    #[test]
    fn test_full_run_determinism() {
        // Two independent simulations fed the identical ordered
        // intent/tick sequence agree after every step.
        let (mut a, content) = new_run(1337, 3);
        let (mut b, _) = new_run(1337, 3);

        for _ in 0..3 {
            tick(&mut a);
            tick(&mut b);
            assert_eq!(a.state_digest(), b.state_digest());
            clear_current_room(&mut a, &content);
            clear_current_room(&mut b, &content);
            assert_eq!(a.sanity, b.sanity);
            assert_eq!(a.momentum, b.momentum);
            assert_eq!(a.temporal_state, b.temporal_state);
            assert_eq!(a.state_digest(), b.state_digest());
        }
    }

    #[test]
    fn test_search_failure_penalizes() {
        let (mut sim, content) = new_run(7, 3);
        let artifact_id = find_hotspot(&sim, &content, |k| {
            matches!(k, HotspotKind::Artifact { .. })
        })
        .id
        .clone();
        apply_intent(
            &mut sim,
            &content,
            &Intent::ClaimHotspot {
                hotspot_id: artifact_id.clone(),
            },
        )
        .unwrap();

        let key = sim.current_scene_key().unwrap();
        let success_index = sim.scene_state(&key).unwrap().search_profiles[&artifact_id]
            .success_index;
        let wrong_index = (success_index + 1) % 3;

        let sanity_before = sim.sanity;
        let momentum_before = sim.momentum;
        apply_intent(
            &mut sim,
            &content,
            &Intent::SearchAction {
                hotspot_id: artifact_id.clone(),
                action_index: wrong_index,
            },
        )
        .unwrap();

        assert_eq!(sim.sanity, sanity_before - 3.0);
        assert_eq!(sim.momentum, momentum_before + 2.0);
        assert!(!sim.owns(&artifact_id));
        // Not discovered: a retry keeps the same profile.
        let profile = &sim.scene_state(&key).unwrap().search_profiles[&artifact_id];
        assert_eq!(profile.attempts, 1);
    }

    #[test]
    fn test_hint_marks_success_action_and_is_consumed() {
        let (mut sim, content) = new_run(21, 3);
        let key = sim.current_scene_key().unwrap();
        sim.scene_state_mut(&key).set_flag(flags::HINT_AVAILABLE, true);

        let artifact_id = find_hotspot(&sim, &content, |k| {
            matches!(k, HotspotKind::Artifact { .. })
        })
        .id
        .clone();
        let outcome = apply_intent(
            &mut sim,
            &content,
            &Intent::ClaimHotspot {
                hotspot_id: artifact_id.clone(),
            },
        )
        .unwrap();

        let IntentOutcome::AwaitingSearch(actions) = outcome else {
            panic!("expected search prompt");
        };
        let profile = &sim.scene_state(&key).unwrap().search_profiles[&artifact_id];
        assert!(profile.hinted);
        assert!(actions[profile.success_index]
            .description
            .contains("prior hint vibrates"));
        assert!(!sim.scene_state(&key).unwrap().flag(flags::HINT_AVAILABLE));
    }

    #[test]
    fn test_exit_gated_until_puzzle_solved() {
        let (mut sim, content) = new_run(3, 3);
        let exit = find_hotspot(&sim, &content, |k| matches!(k, HotspotKind::Exit { .. }));
        let HotspotKind::Exit { requires, .. } = &exit.kind else {
            unreachable!();
        };

        if requires.puzzles.is_empty() {
            // This chamber's exit is ungated; nothing to verify here.
            return;
        }

        let outcome = apply_intent(
            &mut sim,
            &content,
            &Intent::ClaimHotspot {
                hotspot_id: exit.id.clone(),
            },
        )
        .unwrap();
        assert_eq!(outcome, IntentOutcome::Ignored);
        let key = sim.current_scene_key().unwrap();
        assert!(!sim.scene_state(&key).unwrap().flag(flags::EXIT_READY));
    }

    #[test]
    fn test_proceed_blocked_without_primed_exit() {
        let (mut sim, content) = new_run(5, 3);
        let outcome = apply_intent(&mut sim, &content, &Intent::Proceed).unwrap();
        assert_eq!(outcome, IntentOutcome::Ignored);
        assert_eq!(sim.cleared_rooms, 0);
        assert_eq!(sim.current_scene_index, 0);
    }

    #[test]
    fn test_gacha_charges_deplete() {
        let (mut sim, content) = new_run(9, 3);
        assert_eq!(sim.gacha_charges, 2);

        assert_eq!(
            apply_intent(&mut sim, &content, &Intent::RollGacha).unwrap(),
            IntentOutcome::Applied
        );
        assert_eq!(sim.inventory.len(), 1);
        assert_eq!(
            apply_intent(&mut sim, &content, &Intent::RollGacha).unwrap(),
            IntentOutcome::Applied
        );
        assert_eq!(
            apply_intent(&mut sim, &content, &Intent::RollGacha).unwrap(),
            IntentOutcome::Ignored
        );
        assert_eq!(sim.inventory.len(), 2);
    }

    #[test]
    fn test_auto_solve_consumes_flag() {
        let (mut sim, content) = new_run(13, 3);
        let key = sim.current_scene_key().unwrap();
        sim.scene_state_mut(&key).set_flag(flags::AUTO_SOLVE, true);

        let puzzle_hotspot =
            find_hotspot(&sim, &content, |k| matches!(k, HotspotKind::Puzzle(_))).clone();
        let HotspotKind::Puzzle(puzzle) = &puzzle_hotspot.kind else {
            unreachable!();
        };
        // Pick a failure option; auto-solve preempts it.
        let failure_option = puzzle
            .options
            .iter()
            .find(|o| o.outcome == PuzzleOutcome::Failure)
            .unwrap();
        apply_intent(
            &mut sim,
            &content,
            &Intent::ChoosePuzzleOption {
                hotspot_id: puzzle_hotspot.id.clone(),
                option_id: failure_option.id.clone(),
            },
        )
        .unwrap();

        let state = sim.scene_state(&key).unwrap();
        assert!(state.puzzle_solved(&puzzle.id));
        assert!(!state.flag(flags::AUTO_SOLVE));
    }

    #[test]
    fn test_dialogue_speaks_once() {
        let (mut sim, content) = new_run(17, 3);
        let dialogue_hotspot =
            find_hotspot(&sim, &content, |k| matches!(k, HotspotKind::Dialogue(_))).clone();
        let HotspotKind::Dialogue(dialogue) = &dialogue_hotspot.kind else {
            unreachable!();
        };
        let choice = &dialogue.choices[0];

        let intent = Intent::ChooseDialogueOption {
            hotspot_id: dialogue_hotspot.id.clone(),
            choice_id: choice.id.clone(),
        };
        assert_eq!(
            apply_intent(&mut sim, &content, &intent).unwrap(),
            IntentOutcome::Applied
        );
        let key = sim.current_scene_key().unwrap();
        assert_eq!(
            sim.scene_state(&key).unwrap().dialogues.get(&dialogue.id),
            Some(&choice.id)
        );

        assert_eq!(
            apply_intent(&mut sim, &content, &intent).unwrap(),
            IntentOutcome::Ignored
        );
    }

    #[test]
    fn test_intents_ignored_after_game_over() {
        let (mut sim, content) = new_run(23, 3);
        sim.heat_momentum(sim.momentum_cap);
        assert!(sim.game_over);

        let digest = sim.state_digest();
        let outcome = apply_intent(&mut sim, &content, &Intent::RollGacha).unwrap();
        assert_eq!(outcome, IntentOutcome::Ignored);
        assert_eq!(sim.state_digest(), digest);
    }

    #[test]
    fn test_unknown_hotspot_is_an_error() {
        let (mut sim, content) = new_run(29, 3);
        let result = apply_intent(
            &mut sim,
            &content,
            &Intent::ClaimHotspot {
                hotspot_id: "no-such-hotspot".to_string(),
            },
        );
        assert!(matches!(result, Err(IntentError::UnknownHotspot(_))));
    }

    #[test]
    fn test_unbounded_run_never_escapes() {
        let content = GameContent::from_fallback();
        let mut sim = RunSimulation::new(&config(31, RunLength::Unbounded), &content);

        // Clear more rooms than the template pool holds; the queue
        // extends with fresh instances and the run never completes.
        let pool_size = content.scenes.len();
        for _ in 0..(pool_size + 3) {
            clear_current_room(&mut sim, &content);
            assert!(!sim.game_over);
        }
        assert_eq!(sim.cleared_rooms as usize, pool_size + 3);
        assert!(sim.current_instance().is_some());
    }
}
