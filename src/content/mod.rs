//! Content Sources
//!
//! Mode tables and the relic catalog are pluggable: a data source can
//! supply them, and an embedded static set covers every failure. A
//! source being unreachable or malformed is recovered here with a
//! warning and is never surfaced to the player; a *malformed record*
//! inside otherwise-loadable content is a data error and fails fast.

pub mod fallback;

use std::collections::BTreeMap;

use tracing::warn;

use crate::game::artifact::{Artifact, ArtifactCatalog, CatalogError};
use crate::game::config::{ConfigError, ModeConfig, PartyMode, RosterEntry, RunConfig, RunLengthSpec};
use crate::game::scene::{HotspotKind, SceneTemplate};

/// Content loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The external source could not be reached.
    #[error("content source unavailable: {0}")]
    Unavailable(String),

    /// The external source returned unparseable data.
    #[error("malformed content: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The catalog rejected a record.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A mode or roster setting is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown mode key: {0}")]
    UnknownMode(String),

    #[error("unknown run length key: {0}")]
    UnknownLength(String),

    /// A scene references an artifact id missing from the catalog.
    #[error("scene {scene} references unknown artifact {artifact}")]
    UnknownArtifact { scene: String, artifact: String },

    /// Content carries no chamber blueprints at all.
    #[error("no scene templates loaded")]
    NoScenes,

    /// A scene's embedded effect list failed validation.
    #[error("scene {scene}: {source}")]
    BadScene {
        scene: String,
        source: crate::game::effect::EffectError,
    },
}

/// External relic catalog supplier.
pub trait ArtifactDataSource {
    /// All available artifact ids.
    fn list_artifact_ids(&self) -> Result<Vec<String>, ContentError>;
    /// Load one artifact record.
    fn load_artifact(&self, id: &str) -> Result<Artifact, ContentError>;
}

/// External mode/length table supplier.
pub trait ModeConfigSource {
    fn load_modes(&self) -> Result<BTreeMap<String, ModeConfig>, ContentError>;
    fn load_run_lengths(&self) -> Result<BTreeMap<String, RunLengthSpec>, ContentError>;
}

/// Load and validate a catalog from a source.
pub fn load_catalog(source: &dyn ArtifactDataSource) -> Result<ArtifactCatalog, ContentError> {
    let ids = source.list_artifact_ids()?;
    let mut artifacts = Vec::with_capacity(ids.len());
    for id in ids {
        artifacts.push(source.load_artifact(&id)?);
    }
    Ok(ArtifactCatalog::new(artifacts)?)
}

/// Everything a run needs: catalog, chamber blueprints, and the mode and
/// length tables.
#[derive(Clone, Debug, PartialEq)]
pub struct GameContent {
    pub catalog: ArtifactCatalog,
    pub scenes: Vec<SceneTemplate>,
    pub modes: BTreeMap<String, ModeConfig>,
    pub lengths: BTreeMap<String, RunLengthSpec>,
}

impl GameContent {
    /// Assemble and cross-validate content.
    pub fn new(
        catalog: ArtifactCatalog,
        scenes: Vec<SceneTemplate>,
        modes: BTreeMap<String, ModeConfig>,
        lengths: BTreeMap<String, RunLengthSpec>,
    ) -> Result<Self, ContentError> {
        if scenes.is_empty() {
            return Err(ContentError::NoScenes);
        }
        for mode in modes.values() {
            mode.validate()?;
        }
        for scene in &scenes {
            scene.validate().map_err(|source| ContentError::BadScene {
                scene: scene.id.clone(),
                source,
            })?;
            for hotspot in &scene.hotspots {
                let referenced: Vec<&String> = match &hotspot.kind {
                    HotspotKind::Artifact { pool } => pool.iter().collect(),
                    HotspotKind::Puzzle(p) => {
                        p.requires.fallback_artifact.iter().collect()
                    }
                    HotspotKind::Exit { requires, .. } => {
                        requires.fallback_artifact.iter().collect()
                    }
                    HotspotKind::Dialogue(_) => Vec::new(),
                };
                for artifact in referenced {
                    if !catalog.contains(artifact) {
                        return Err(ContentError::UnknownArtifact {
                            scene: scene.id.clone(),
                            artifact: artifact.clone(),
                        });
                    }
                }
            }
        }
        Ok(Self {
            catalog,
            scenes,
            modes,
            lengths,
        })
    }

    /// The embedded static content set.
    ///
    /// The embedded data is validated like any other source; a failure
    /// here is a programmer error and panics at startup, never during
    /// simulation.
    pub fn from_fallback() -> Self {
        let catalog = ArtifactCatalog::new(fallback::catalog()).expect("embedded catalog is valid");
        Self::new(
            catalog,
            fallback::scenes(),
            fallback::modes(),
            fallback::run_lengths(),
        )
        .expect("embedded content is valid")
    }

    /// Load from external sources, falling back to the embedded set
    /// part-by-part on any failure. Never errors, never surfaces to the
    /// player.
    pub fn load(
        artifact_source: &dyn ArtifactDataSource,
        mode_source: &dyn ModeConfigSource,
    ) -> Self {
        let catalog = match load_catalog(artifact_source) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!("artifact source failed ({err}); using embedded catalog");
                ArtifactCatalog::new(fallback::catalog()).expect("embedded catalog is valid")
            }
        };

        let modes = match mode_source.load_modes() {
            Ok(modes) if !modes.is_empty() => modes,
            Ok(_) => {
                warn!("mode source returned no modes; using embedded table");
                fallback::modes()
            }
            Err(err) => {
                warn!("mode source failed ({err}); using embedded table");
                fallback::modes()
            }
        };

        let lengths = match mode_source.load_run_lengths() {
            Ok(lengths) if !lengths.is_empty() => lengths,
            Ok(_) => {
                warn!("mode source returned no run lengths; using embedded table");
                fallback::run_lengths()
            }
            Err(err) => {
                warn!("length source failed ({err}); using embedded table");
                fallback::run_lengths()
            }
        };

        match Self::new(catalog, fallback::scenes(), modes, lengths) {
            Ok(content) => content,
            Err(err) => {
                warn!("external content rejected ({err}); using embedded defaults");
                Self::from_fallback()
            }
        }
    }

    /// Look up a scene template by id.
    pub fn scene(&self, template_id: &str) -> Option<&SceneTemplate> {
        self.scenes.iter().find(|s| s.id == template_id)
    }

    /// Resolve a run configuration against the loaded tables.
    pub fn resolve_config(
        &self,
        seed: u32,
        mode_key: &str,
        length_key: &str,
        roster: Vec<RosterEntry>,
        party_mode: PartyMode,
    ) -> Result<RunConfig, ContentError> {
        RunConfig::resolve(
            seed,
            mode_key,
            length_key,
            roster,
            party_mode,
            &self.modes,
            &self.lengths,
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::RunLength;
    use crate::game::effect::Effect;

    struct DeadSource;

    impl ArtifactDataSource for DeadSource {
        fn list_artifact_ids(&self) -> Result<Vec<String>, ContentError> {
            Err(ContentError::Unavailable("connection refused".to_string()))
        }
        fn load_artifact(&self, _id: &str) -> Result<Artifact, ContentError> {
            Err(ContentError::Unavailable("connection refused".to_string()))
        }
    }

    impl ModeConfigSource for DeadSource {
        fn load_modes(&self) -> Result<BTreeMap<String, ModeConfig>, ContentError> {
            Err(ContentError::Unavailable("connection refused".to_string()))
        }
        fn load_run_lengths(&self) -> Result<BTreeMap<String, RunLengthSpec>, ContentError> {
            Err(ContentError::Unavailable("connection refused".to_string()))
        }
    }

    struct TinySource;

    impl ArtifactDataSource for TinySource {
        fn list_artifact_ids(&self) -> Result<Vec<String>, ContentError> {
            Ok(fallback::catalog()
                .iter()
                .map(|a| a.id.clone())
                .collect())
        }
        fn load_artifact(&self, id: &str) -> Result<Artifact, ContentError> {
            fallback::catalog()
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or_else(|| ContentError::Unavailable(format!("missing {id}")))
        }
    }

    #[test]
    fn test_fallback_content_is_valid() {
        let content = GameContent::from_fallback();
        assert!(!content.catalog.is_empty());
        assert!(!content.scenes.is_empty());
        assert!(content.modes.contains_key("normal"));
        assert!(content.lengths.contains_key("brief"));
    }

    #[test]
    fn test_dead_source_recovers_to_fallback() {
        let content = GameContent::load(&DeadSource, &DeadSource);
        let embedded = GameContent::from_fallback();
        assert_eq!(content.catalog, embedded.catalog);
        assert_eq!(content.modes, embedded.modes);
        assert_eq!(content.lengths, embedded.lengths);
    }

    #[test]
    fn test_live_source_is_used() {
        let content = GameContent::load(&TinySource, &DeadSource);
        assert_eq!(content.catalog.len(), fallback::catalog().len());
    }

    #[test]
    fn test_cross_validation_rejects_unknown_pool_id() {
        let mut scenes = fallback::scenes();
        if let HotspotKind::Artifact { pool } = &mut scenes[0].hotspots[0].kind {
            pool.push("not-a-real-relic".to_string());
        } else {
            panic!("first hotspot of first scene expected to be a relic");
        }

        let result = GameContent::new(
            ArtifactCatalog::new(fallback::catalog()).unwrap(),
            scenes,
            fallback::modes(),
            fallback::run_lengths(),
        );
        assert!(matches!(result, Err(ContentError::UnknownArtifact { .. })));
    }

    #[test]
    fn test_resolve_config_rejects_unknown_keys() {
        let content = GameContent::from_fallback();
        let roster = vec![RosterEntry {
            id: "p1".to_string(),
            name: "Echo Runner".to_string(),
        }];

        assert!(matches!(
            content.resolve_config(1, "no-such-mode", "brief", roster.clone(), PartyMode::Solo),
            Err(ContentError::UnknownMode(_))
        ));
        assert!(matches!(
            content.resolve_config(1, "normal", "no-such-length", roster.clone(), PartyMode::Solo),
            Err(ContentError::UnknownLength(_))
        ));

        let config = content
            .resolve_config(1, "normal", "brief", roster, PartyMode::Solo)
            .unwrap();
        assert_eq!(config.length, RunLength::Rooms(3));
    }

    #[test]
    fn test_resolve_config_rejects_empty_roster() {
        let content = GameContent::from_fallback();
        assert!(matches!(
            content.resolve_config(1, "normal", "brief", vec![], PartyMode::Solo),
            Err(ContentError::Config(ConfigError::EmptyRoster))
        ));
    }

    #[test]
    fn test_fallback_catalog_covers_every_effect_kind() {
        // The embedded set should exercise the whole interpreter.
        let catalog = fallback::catalog();
        let mut has = [false; 9];
        fn scan(effects: &[Effect], has: &mut [bool; 9]) {
            for effect in effects {
                match effect {
                    Effect::Sanity { .. } => has[0] = true,
                    Effect::Momentum { .. } => has[1] = true,
                    Effect::Drain { .. } => has[2] = true,
                    Effect::Hint => has[3] = true,
                    Effect::Shield => has[4] = true,
                    Effect::AutoSolve => has[5] = true,
                    Effect::FreeEscape => has[6] = true,
                    Effect::GrantArtifact { .. } => has[7] = true,
                    Effect::Combo { effects, .. } => {
                        has[8] = true;
                        scan(effects, has);
                    }
                    _ => {}
                }
            }
        }
        for artifact in &catalog {
            scan(&artifact.effects, &mut has);
        }
        assert!(has.iter().all(|&b| b), "coverage: {has:?}");
    }
}
