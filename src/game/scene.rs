//! Scene Templates
//!
//! Chambers, hotspots, puzzles, and dialogues as pure data. A template
//! carries no per-run state; each traversal instantiates it with its own
//! key, state, and artifact roll.

use serde::{Deserialize, Serialize};

use crate::game::effect::{validate_effects, Effect, EffectError};

/// A chamber blueprint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objective: String,
    pub hotspots: Vec<Hotspot>,
}

impl SceneTemplate {
    /// Find a hotspot by id.
    pub fn hotspot(&self, hotspot_id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == hotspot_id)
    }

    /// Ids of puzzle hotspots, for objective summaries.
    pub fn puzzle_ids(&self) -> Vec<&str> {
        self.hotspots
            .iter()
            .filter_map(|h| match &h.kind {
                HotspotKind::Puzzle(p) => Some(p.id.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Validate all embedded effect lists.
    pub fn validate(&self) -> Result<(), EffectError> {
        for hotspot in &self.hotspots {
            match &hotspot.kind {
                HotspotKind::Puzzle(puzzle) => {
                    for option in &puzzle.options {
                        validate_effects(&option.effects)?;
                    }
                }
                HotspotKind::Dialogue(dialogue) => {
                    for choice in &dialogue.choices {
                        validate_effects(&choice.effects)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// An interactive point within a scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    pub label: String,
    pub kind: HotspotKind,
}

/// What a hotspot does when touched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HotspotKind {
    /// A hidden relic; searched first, then claimed.
    Artifact { pool: Vec<String> },
    /// A mechanism with one correct option.
    Puzzle(Puzzle),
    /// An echo offering a choice.
    Dialogue(Dialogue),
    /// The chamber exit.
    Exit {
        #[serde(default)]
        requires: Requirements,
        success_text: String,
    },
}

/// Gating demands a hotspot can place on the party. A designated
/// fallback artifact in inventory overrides the demand, once per
/// hotspot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Puzzle ids that must be solved in this instance.
    #[serde(default)]
    pub puzzles: Vec<String>,
    /// At least one of these artifacts must be owned.
    #[serde(default)]
    pub artifacts_any: Vec<String>,
    /// All of these artifacts must be owned.
    #[serde(default)]
    pub artifacts_all: Vec<String>,
    /// A scene flag that must be set.
    #[serde(default)]
    pub hint_flag: Option<String>,
    /// Owning this artifact overrides any unmet demand.
    #[serde(default)]
    pub fallback_artifact: Option<String>,
}

impl Requirements {
    /// Whether this set demands anything at all.
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
            && self.artifacts_any.is_empty()
            && self.artifacts_all.is_empty()
            && self.hint_flag.is_none()
    }
}

/// A mechanism hotspot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub prompt: String,
    pub options: Vec<PuzzleOption>,
    #[serde(default)]
    pub requires: Requirements,
}

impl Puzzle {
    /// Find an option by id.
    pub fn option(&self, option_id: &str) -> Option<&PuzzleOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// One selectable answer to a puzzle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleOption {
    pub id: String,
    pub title: String,
    pub description: String,
    pub outcome: PuzzleOutcome,
    pub effects: Vec<Effect>,
}

/// Whether an option stabilizes the mechanism.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleOutcome {
    Success,
    Failure,
}

/// An echo hotspot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    pub id: String,
    pub title: String,
    pub body: String,
    pub choices: Vec<DialogueChoice>,
}

impl Dialogue {
    /// Find a choice by id.
    pub fn choice(&self, choice_id: &str) -> Option<&DialogueChoice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

/// One dialogue response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub id: String,
    pub title: String,
    pub description: String,
    pub effects: Vec<Effect>,
    pub log: String,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::game::effect::Direction;

    #[test]
    fn test_builtin_scenes_validate() {
        for scene in content::fallback::scenes() {
            scene.validate().unwrap_or_else(|e| {
                panic!("scene {} failed validation: {e}", scene.id);
            });
        }
    }

    #[test]
    fn test_builtin_scenes_are_complete_chambers() {
        let scenes = content::fallback::scenes();
        assert!(!scenes.is_empty());

        for scene in &scenes {
            let mut artifact_count = 0;
            let mut puzzle_count = 0;
            let mut exit_count = 0;
            for hotspot in &scene.hotspots {
                match &hotspot.kind {
                    HotspotKind::Artifact { pool } => {
                        artifact_count += 1;
                        assert!(!pool.is_empty(), "{}: empty artifact pool", scene.id);
                    }
                    HotspotKind::Puzzle(p) => {
                        puzzle_count += 1;
                        assert!(
                            p.options
                                .iter()
                                .any(|o| o.outcome == PuzzleOutcome::Success),
                            "{}: puzzle without a success option",
                            scene.id
                        );
                    }
                    HotspotKind::Exit { requires, .. } => {
                        exit_count += 1;
                        // Exits gate on puzzles from the same chamber
                        // only, so any queue composition is escapable.
                        for puzzle_id in &requires.puzzles {
                            assert!(
                                scene.puzzle_ids().contains(&puzzle_id.as_str()),
                                "{}: exit requires foreign puzzle {puzzle_id}",
                                scene.id
                            );
                        }
                    }
                    HotspotKind::Dialogue(_) => {}
                }
            }
            assert!(artifact_count >= 1, "{}: no relic hotspot", scene.id);
            assert!(puzzle_count >= 1, "{}: no puzzle hotspot", scene.id);
            assert_eq!(exit_count, 1, "{}: exactly one exit expected", scene.id);
        }
    }

    #[test]
    fn test_hotspot_lookup() {
        let scenes = content::fallback::scenes();
        let scene = &scenes[0];
        let first = &scene.hotspots[0];
        assert_eq!(scene.hotspot(&first.id).unwrap().id, first.id);
        assert!(scene.hotspot("no-such-hotspot").is_none());
    }

    #[test]
    fn test_scene_validation_catches_bad_effects() {
        let scene = SceneTemplate {
            id: "broken".to_string(),
            name: "Broken".to_string(),
            description: String::new(),
            objective: String::new(),
            hotspots: vec![Hotspot {
                id: "broken-puzzle".to_string(),
                label: "Broken".to_string(),
                kind: HotspotKind::Puzzle(Puzzle {
                    id: "broken-puzzle".to_string(),
                    prompt: String::new(),
                    options: vec![PuzzleOption {
                        id: "opt".to_string(),
                        title: String::new(),
                        description: String::new(),
                        outcome: PuzzleOutcome::Failure,
                        effects: vec![Effect::Momentum {
                            direction: Direction::Heat,
                            amount: -5.0,
                            message: None,
                        }],
                    }],
                    requires: Requirements::default(),
                }),
            }],
        };
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_scene_json_roundtrip() {
        let scenes = content::fallback::scenes();
        let json = serde_json::to_string(&scenes[0]).unwrap();
        let parsed: SceneTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scenes[0]);
    }
}
