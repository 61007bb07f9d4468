//! Effect Descriptors and Resolution
//!
//! Relic, puzzle, and dialogue outcomes are expressed as ordered lists of
//! a closed tagged sum type - pure data, validated eagerly at catalog
//! load. Bespoke behavior becomes a new named variant added to this
//! interpreter, never code embedded in content.

use serde::{Deserialize, Serialize};

use crate::game::artifact::{ArtifactCatalog, DrawRequest, Rarity};
use crate::game::config::{DRAIN_CEILING, DRAIN_FLOOR};
use crate::game::state::{flags, RunSimulation, TemporalState, Tone};

/// Which way a momentum effect pushes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Heat,
    Cool,
}

/// Where a granted artifact is drawn from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantSource {
    /// Draw from an explicit id pool.
    Pool(Vec<String>),
    /// Draw restricted to a single rarity tier.
    Rarity(Rarity),
    /// Grant one specific artifact.
    Artifact(String),
    /// Draw from the whole catalog.
    Any,
}

fn default_drain_floor() -> f64 {
    DRAIN_FLOOR
}

fn default_drain_ceiling() -> f64 {
    DRAIN_CEILING
}

/// One tagged effect. Resolving a list applies each variant in order
/// against the simulation, the triggering scene instance, and (for
/// grants) the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Adjust sanity by a signed amount.
    Sanity {
        amount: f64,
        #[serde(default)]
        message: Option<String>,
    },
    /// Heat or cool momentum by a positive amount.
    Momentum {
        direction: Direction,
        amount: f64,
        #[serde(default)]
        message: Option<String>,
    },
    /// Shift the drain rate, clamped to the given bounds.
    Drain {
        amount: f64,
        #[serde(default = "default_drain_floor")]
        floor: f64,
        #[serde(default = "default_drain_ceiling")]
        ceiling: f64,
        #[serde(default)]
        message: Option<String>,
    },
    /// Leave a hint for the next search in this chamber.
    Hint,
    /// Pre-guide searches everywhere for the rest of the run.
    ScanAssist,
    /// Set a scene-local flag.
    SceneFlag { key: String, value: bool },
    /// Set a run-global flag.
    GlobalFlag { key: String, value: bool },
    /// Arm a one-shot ward against the next sanity loss in this chamber.
    Shield,
    /// The next gated mechanism in this chamber resolves itself.
    AutoSolve,
    /// One barrier this run yields without question.
    FreeEscape,
    /// Draw another artifact and apply its effects recursively.
    GrantArtifact {
        source: GrantSource,
        #[serde(default)]
        message: Option<String>,
    },
    /// Apply nested effects only while the full relic set is owned,
    /// scaled by the run's combo intensity; otherwise emit the fallback
    /// message and nothing else.
    Combo {
        requires: Vec<String>,
        effects: Vec<Effect>,
        else_message: String,
    },
    /// Kick the flux into an excited state with an optional bump.
    Event {
        state: TemporalState,
        ticks: u32,
        #[serde(default)]
        bump: f64,
    },
    /// Settle the flux toward stillness.
    Settle { state: TemporalState, ticks: u32 },
    /// Emit a narrative line.
    Log {
        message: String,
        #[serde(default)]
        tone: Tone,
    },
}

/// Validation failures caught at content load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EffectError {
    #[error("sanity amount must be finite")]
    NonFiniteSanity,

    #[error("momentum amount must be finite and positive, got {0}")]
    InvalidMomentumAmount(f64),

    #[error("drain bounds inverted or non-finite: floor {floor}, ceiling {ceiling}")]
    InvalidDrainBounds { floor: f64, ceiling: f64 },

    #[error("event effects may only target active or surge")]
    InvalidEventState,

    #[error("settle effects may only target calm or frozen")]
    InvalidSettleState,

    #[error("combo requires at least one artifact id")]
    EmptyComboRequirement,

    #[error("grant pool must not be empty")]
    EmptyGrantPool,

    #[error("event bump must be finite and non-negative, got {0}")]
    InvalidEventBump(f64),
}

/// Validate an effect list eagerly. Called at catalog/scene load so
/// malformed records fail during ingestion, never during simulation.
pub fn validate_effects(effects: &[Effect]) -> Result<(), EffectError> {
    for effect in effects {
        match effect {
            Effect::Sanity { amount, .. } => {
                if !amount.is_finite() {
                    return Err(EffectError::NonFiniteSanity);
                }
            }
            Effect::Momentum { amount, .. } => {
                if !amount.is_finite() || *amount <= 0.0 {
                    return Err(EffectError::InvalidMomentumAmount(*amount));
                }
            }
            Effect::Drain {
                amount,
                floor,
                ceiling,
                ..
            } => {
                if !amount.is_finite()
                    || !floor.is_finite()
                    || !ceiling.is_finite()
                    || floor > ceiling
                    || *floor <= 0.0
                {
                    return Err(EffectError::InvalidDrainBounds {
                        floor: *floor,
                        ceiling: *ceiling,
                    });
                }
            }
            Effect::Event { state, bump, .. } => {
                if !matches!(state, TemporalState::Active | TemporalState::Surge) {
                    return Err(EffectError::InvalidEventState);
                }
                if !bump.is_finite() || *bump < 0.0 {
                    return Err(EffectError::InvalidEventBump(*bump));
                }
            }
            Effect::Settle { state, .. } => {
                if !matches!(state, TemporalState::Calm | TemporalState::Frozen) {
                    return Err(EffectError::InvalidSettleState);
                }
            }
            Effect::Combo {
                requires, effects, ..
            } => {
                if requires.is_empty() {
                    return Err(EffectError::EmptyComboRequirement);
                }
                validate_effects(effects)?;
            }
            Effect::GrantArtifact {
                source: GrantSource::Pool(pool),
                ..
            } => {
                if pool.is_empty() {
                    return Err(EffectError::EmptyGrantPool);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Resolve an ordered effect list against the simulation.
///
/// The resolver performs no idempotence check; callers guard against
/// re-triggering already-resolved hotspots.
pub fn resolve_effects(
    sim: &mut RunSimulation,
    scene_key: &str,
    catalog: &ArtifactCatalog,
    effects: &[Effect],
) {
    apply_list(sim, scene_key, catalog, effects, 1.0);
}

fn apply_list(
    sim: &mut RunSimulation,
    scene_key: &str,
    catalog: &ArtifactCatalog,
    effects: &[Effect],
    intensity: f64,
) {
    for effect in effects {
        // A terminal transition mid-list stops the remainder; the run is
        // already over and mutators would no-op anyway.
        if sim.game_over {
            return;
        }
        match effect {
            Effect::Sanity { amount, message } => {
                sim.adjust_sanity(amount * intensity, message.as_deref());
            }
            Effect::Momentum {
                direction,
                amount,
                message,
            } => {
                let amount = amount * intensity;
                match direction {
                    Direction::Cool => {
                        sim.cool_momentum(amount);
                        if let Some(msg) = message {
                            sim.log(Tone::Positive, msg);
                        }
                    }
                    Direction::Heat => {
                        sim.heat_momentum(amount);
                        if !sim.game_over {
                            if let Some(msg) = message {
                                sim.log(Tone::Negative, msg);
                            }
                        }
                    }
                }
            }
            Effect::Drain {
                amount,
                floor,
                ceiling,
                message,
            } => {
                sim.adjust_drain(amount * intensity, *floor, *ceiling);
                if let Some(msg) = message {
                    let tone = if *amount <= 0.0 {
                        Tone::Positive
                    } else {
                        Tone::Negative
                    };
                    sim.log(tone, msg);
                }
            }
            Effect::Hint => {
                sim.scene_state_mut(scene_key)
                    .set_flag(flags::HINT_AVAILABLE, true);
            }
            Effect::ScanAssist => {
                sim.set_flag(flags::SCAN_ASSIST, true);
            }
            Effect::SceneFlag { key, value } => {
                sim.scene_state_mut(scene_key).set_flag(key, *value);
            }
            Effect::GlobalFlag { key, value } => {
                sim.set_flag(key, *value);
            }
            Effect::Shield => {
                sim.scene_state_mut(scene_key)
                    .set_flag(flags::SAND_WARD, true);
            }
            Effect::AutoSolve => {
                sim.scene_state_mut(scene_key)
                    .set_flag(flags::AUTO_SOLVE, true);
            }
            Effect::FreeEscape => {
                sim.set_flag(flags::FREE_ESCAPE, true);
            }
            Effect::GrantArtifact { source, message } => {
                grant_artifact(sim, scene_key, catalog, source, message.as_deref(), intensity);
            }
            Effect::Combo {
                requires,
                effects,
                else_message,
            } => {
                if requires.iter().all(|id| sim.owns(id)) {
                    let combo = intensity * sim.combo_intensity;
                    apply_list(sim, scene_key, catalog, effects, combo);
                } else {
                    // No partial application: the fallback message is the
                    // only observable outcome.
                    sim.log(Tone::Neutral, else_message);
                }
            }
            Effect::Event { state, ticks, bump } => {
                sim.trigger_temporal_event(*state, *ticks, bump * intensity);
            }
            Effect::Settle { state, ticks } => {
                sim.settle_temporal_flow(*state, *ticks);
            }
            Effect::Log { message, tone } => {
                sim.log(*tone, message);
            }
        }
    }
}

/// Draw an artifact for a grant effect, add it to the inventory, then
/// recursively apply its own effect list.
fn grant_artifact(
    sim: &mut RunSimulation,
    scene_key: &str,
    catalog: &ArtifactCatalog,
    source: &GrantSource,
    message: Option<&str>,
    intensity: f64,
) {
    let drawn = match source {
        GrantSource::Artifact(id) => catalog.get(id).cloned(),
        GrantSource::Rarity(rarity) => {
            let request = DrawRequest {
                bias: sim.rarity_bias,
                rarity: Some(*rarity),
                pool: None,
                owned: &sim.inventory_ids,
                gacha_bonus: None,
            };
            catalog.weighted_draw(&mut sim.rng, &request).cloned()
        }
        GrantSource::Pool(pool) => {
            let request = DrawRequest {
                bias: sim.rarity_bias,
                rarity: None,
                pool: Some(pool),
                owned: &sim.inventory_ids,
                gacha_bonus: None,
            };
            catalog.weighted_draw(&mut sim.rng, &request).cloned()
        }
        GrantSource::Any => {
            let request = DrawRequest {
                bias: sim.rarity_bias,
                rarity: None,
                pool: None,
                owned: &sim.inventory_ids,
                gacha_bonus: None,
            };
            catalog.weighted_draw(&mut sim.rng, &request).cloned()
        }
    };

    let Some(artifact) = drawn else {
        return;
    };

    sim.push_inventory(&artifact.id, scene_key);
    if let Some(msg) = message {
        sim.log(Tone::Positive, msg);
    }
    sim.log(Tone::System, &format!("{} claimed.", artifact.name));
    apply_list(sim, scene_key, catalog, &artifact.effects, intensity);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::GameContent;
    use crate::game::config::{ModeConfig, PartyMode, RosterEntry, RunConfig, RunLength};

    fn new_sim() -> (RunSimulation, GameContent) {
        let content = GameContent::from_fallback();
        let config = RunConfig {
            seed: 42,
            mode_key: "normal".to_string(),
            length_key: "brief".to_string(),
            mode: ModeConfig {
                label: "Normal".to_string(),
                rarity_bias: [1.0; 5],
                gacha_rarity_bonus: [1.0; 5],
                gacha_charges: 2,
                combo_intensity: 1.5,
            },
            length: RunLength::Rooms(3),
            roster: vec![RosterEntry {
                id: "p1".to_string(),
                name: "Echo Runner".to_string(),
            }],
            party_mode: PartyMode::Solo,
        };
        let sim = RunSimulation::new(&config, &content);
        (sim, content)
    }

    fn scene_key(sim: &RunSimulation) -> String {
        sim.current_scene_key().unwrap()
    }

    #[test]
    fn test_sanity_and_momentum_effects() {
        let (mut sim, content) = new_sim();
        let key = scene_key(&sim);
        sim.adjust_sanity(-50.0, None);
        let sanity_before = sim.sanity;

        let effects = vec![
            Effect::Sanity {
                amount: 8.0,
                message: Some("Warm clockwork steam laps at your senses.".to_string()),
            },
            Effect::Momentum {
                direction: Direction::Heat,
                amount: 5.0,
                message: None,
            },
        ];
        resolve_effects(&mut sim, &key, &content.catalog, &effects);

        assert_eq!(sim.sanity, sanity_before + 8.0);
        assert_eq!(sim.momentum, 5.0);
        assert!(sim
            .logs
            .iter()
            .any(|l| l.message.contains("clockwork steam")));
    }

    #[test]
    fn test_drain_respects_effect_bounds() {
        let (mut sim, content) = new_sim();
        let key = scene_key(&sim);

        let effects = vec![Effect::Drain {
            amount: 10.0,
            floor: 0.1,
            ceiling: 3.5,
            message: None,
        }];
        resolve_effects(&mut sim, &key, &content.catalog, &effects);
        assert_eq!(sim.drain_rate, 3.5);

        let effects = vec![Effect::Drain {
            amount: -10.0,
            floor: 0.35,
            ceiling: 4.0,
            message: None,
        }];
        resolve_effects(&mut sim, &key, &content.catalog, &effects);
        assert_eq!(sim.drain_rate, 0.35);
    }

    #[test]
    fn test_flag_effects() {
        let (mut sim, content) = new_sim();
        let key = scene_key(&sim);

        let effects = vec![
            Effect::Hint,
            Effect::Shield,
            Effect::AutoSolve,
            Effect::ScanAssist,
            Effect::FreeEscape,
            Effect::SceneFlag {
                key: flags::REVEALED_PATHS.to_string(),
                value: true,
            },
        ];
        resolve_effects(&mut sim, &key, &content.catalog, &effects);

        let scene = sim.scene_state(&key).unwrap();
        assert!(scene.flag(flags::HINT_AVAILABLE));
        assert!(scene.flag(flags::SAND_WARD));
        assert!(scene.flag(flags::AUTO_SOLVE));
        assert!(scene.flag(flags::REVEALED_PATHS));
        assert!(sim.flag(flags::SCAN_ASSIST));
        assert!(sim.flag(flags::FREE_ESCAPE));
    }

    fn combo_effect() -> Effect {
        Effect::Combo {
            requires: vec!["chrono-lens".to_string(), "temporal-anchor".to_string()],
            effects: vec![
                Effect::Sanity {
                    amount: 10.0,
                    message: None,
                },
                Effect::Momentum {
                    direction: Direction::Cool,
                    amount: 4.0,
                    message: None,
                },
            ],
            else_message: "The covenant waits for lens and anchor to align.".to_string(),
        }
    }

    #[test]
    fn test_combo_requires_full_set() {
        let (mut sim, content) = new_sim();
        let key = scene_key(&sim);
        sim.adjust_sanity(-40.0, None);
        sim.momentum = 20.0;

        // Owning only one of the pair triggers the fallback path and
        // zero nested effects.
        sim.push_inventory("chrono-lens", &key);
        let sanity = sim.sanity;
        resolve_effects(&mut sim, &key, &content.catalog, &[combo_effect()]);
        assert_eq!(sim.sanity, sanity);
        assert_eq!(sim.momentum, 20.0);
        assert!(sim
            .logs
            .iter()
            .any(|l| l.message.contains("waits for lens and anchor")));
    }

    #[test]
    fn test_combo_applies_with_intensity() {
        let (mut sim, content) = new_sim();
        let key = scene_key(&sim);
        sim.adjust_sanity(-40.0, None);
        sim.momentum = 20.0;

        sim.push_inventory("chrono-lens", &key);
        sim.push_inventory("temporal-anchor", &key);
        let sanity = sim.sanity;
        resolve_effects(&mut sim, &key, &content.catalog, &[combo_effect()]);

        // Nested magnitudes scale by the run-wide combo intensity (1.5).
        assert_eq!(sim.sanity, sanity + 15.0);
        assert_eq!(sim.momentum, 14.0);
    }

    #[test]
    fn test_grant_artifact_by_id() {
        let (mut sim, content) = new_sim();
        let key = scene_key(&sim);

        let effects = vec![Effect::GrantArtifact {
            source: GrantSource::Artifact("hourwarden-sigil".to_string()),
            message: Some("A sigil materializes in your palm.".to_string()),
        }];
        resolve_effects(&mut sim, &key, &content.catalog, &effects);

        assert!(sim.owns("hourwarden-sigil"));
        // The sigil's own effect list applied recursively.
        assert!(sim.flag(flags::FREE_ESCAPE));
    }

    #[test]
    fn test_grant_artifact_by_rarity() {
        let (mut sim, content) = new_sim();
        let key = scene_key(&sim);

        let effects = vec![Effect::GrantArtifact {
            source: GrantSource::Rarity(Rarity::Common),
            message: None,
        }];
        resolve_effects(&mut sim, &key, &content.catalog, &effects);

        let granted = sim.inventory.last().expect("grant adds to inventory");
        let artifact = content.catalog.get(&granted.artifact_id).unwrap();
        assert_eq!(artifact.rarity, Rarity::Common);
    }

    #[test]
    fn test_resolution_stops_after_terminal() {
        let (mut sim, content) = new_sim();
        let key = scene_key(&sim);

        let effects = vec![
            Effect::Momentum {
                direction: Direction::Heat,
                amount: 1000.0,
                message: None,
            },
            Effect::Sanity {
                amount: 50.0,
                message: Some("never logged".to_string()),
            },
        ];
        resolve_effects(&mut sim, &key, &content.catalog, &effects);

        assert!(sim.game_over);
        assert!(!sim.logs.iter().any(|l| l.message == "never logged"));
    }

    #[test]
    fn test_validation_rejects_bad_records() {
        assert!(validate_effects(&[Effect::Momentum {
            direction: Direction::Heat,
            amount: -3.0,
            message: None,
        }])
        .is_err());

        assert!(validate_effects(&[Effect::Drain {
            amount: 0.1,
            floor: 2.0,
            ceiling: 1.0,
            message: None,
        }])
        .is_err());

        assert!(validate_effects(&[Effect::Event {
            state: TemporalState::Frozen,
            ticks: 3,
            bump: 0.0,
        }])
        .is_err());

        assert!(validate_effects(&[Effect::Settle {
            state: TemporalState::Surge,
            ticks: 3,
        }])
        .is_err());

        assert!(validate_effects(&[Effect::Combo {
            requires: vec![],
            effects: vec![],
            else_message: "nothing".to_string(),
        }])
        .is_err());

        // Nested lists validate recursively.
        assert!(validate_effects(&[Effect::Combo {
            requires: vec!["chrono-lens".to_string()],
            effects: vec![Effect::Momentum {
                direction: Direction::Cool,
                amount: 0.0,
                message: None,
            }],
            else_message: "nothing".to_string(),
        }])
        .is_err());
    }

    #[test]
    fn test_effect_json_shape() {
        let effect = Effect::Momentum {
            direction: Direction::Cool,
            amount: 6.0,
            message: Some("Stray sands collapse into a disciplined ring.".to_string()),
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("\"type\":\"momentum\""));
        assert!(json.contains("\"direction\":\"cool\""));

        let parsed: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, effect);
    }
}
